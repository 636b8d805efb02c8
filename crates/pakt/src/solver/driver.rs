use std::collections::HashSet;
use std::io::{self, Write};
use std::mem;

use varisat::{ExtendFormula, Lit, Solver, Var};

use crate::error::{ResolverError, Result};

/// Verdict of the most recent `solve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolveStatus {
    /// No solve has produced a verdict yet.
    Unknown,
    Satisfiable,
    Unsatisfiable,
}

/// Thin adapter around the incremental SAT engine.
///
/// Callers work with signed nonzero `i32` literals whose absolute
/// values are the ids handed out by the name-id map; the driver owns
/// the translation to engine variables.
///
/// Two pieces of behavior are layered on top of the engine:
///
/// - Every original clause is guarded by a fresh selector variable
///   that is assumed on each solve. On an unsatisfiable outcome the
///   engine's failed-assumption core then names, through the failed
///   selectors, exactly the original clauses witnessing the conflict;
///   `write_clausal_core` emits them with irrelevant clauses pruned.
/// - On a satisfiable outcome the model is refined to the unique
///   lexicographically least assignment in variable-id order (false
///   preferred on lower-numbered variables). Solutions are therefore
///   deterministic, contain nothing that is not required, and keep
///   the highest-numbered satisfiable alternative of every
///   requirement group.
pub(crate) struct SatDriver {
    engine: Solver<'static>,
    /// Engine variable for external id `i`, at index `i - 1`.
    vars: Vec<Var>,
    /// External id per engine variable index; 0 marks selectors.
    ext_ids: Vec<i32>,
    /// Original clauses in insertion order, as signed external ids.
    clauses: Vec<Vec<i32>>,
    /// Selector variable guarding each original clause.
    selectors: Vec<Var>,
    /// Assumptions queued for the next solve; retracted once consumed.
    queued: Vec<i32>,
    /// Assumptions consumed by the last solve.
    last_assumed: Vec<i32>,
    status: SolveStatus,
    /// Model of the last satisfiable solve, indexed by external id.
    model: Vec<bool>,
    /// Engine variables named by the last unsatisfiable core.
    core_vars: HashSet<usize>,
}

impl SatDriver {
    pub fn new() -> Self {
        Self {
            engine: Solver::new(),
            vars: Vec::new(),
            ext_ids: Vec::new(),
            clauses: Vec::new(),
            selectors: Vec::new(),
            queued: Vec::new(),
            last_assumed: Vec::new(),
            status: SolveStatus::Unknown,
            model: Vec::new(),
            core_vars: HashSet::new(),
        }
    }

    /// Pre-allocate engine variables for external ids `1..=count`.
    pub fn set_variable_hint(&mut self, count: usize) {
        self.reserve_vars(count);
    }

    /// Add original clauses, each a sequence of nonzero signed
    /// external literals.
    pub fn add_clauses(&mut self, formula: &[Vec<i32>]) {
        for clause in formula {
            let mut lits: Vec<Lit> = Vec::with_capacity(clause.len() + 1);
            for &l in clause {
                lits.push(self.lit(l));
            }
            let selector = self.engine.new_var();
            self.ext_ids.push(0);
            lits.push(selector.negative());
            self.engine.add_clause(&lits);

            self.clauses.push(clause.clone());
            self.selectors.push(selector);
        }
    }

    /// Queue an assumption for the next solve. Assumptions hold for
    /// exactly one solve and are then retracted.
    pub fn assume(&mut self, lit: i32) {
        assert!(lit != 0, "0 is not a valid literal");
        self.lit(lit);
        self.queued.push(lit);
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Solve under the queued assumptions plus all clause selectors.
    pub fn solve(&mut self) -> Result<SolveStatus> {
        let queued = mem::take(&mut self.queued);
        let mut assumps: Vec<Lit> = self.selectors.iter().map(|s| s.positive()).collect();
        for &l in &queued {
            assumps.push(self.lit(l));
        }
        self.last_assumed = queued;
        self.core_vars.clear();

        if self.run(&assumps)? {
            self.minimize(assumps)?;
            self.status = SolveStatus::Satisfiable;
        } else {
            if let Some(core) = self.engine.failed_core() {
                self.core_vars = core.iter().map(|l| l.var().index()).collect();
            }
            self.model.clear();
            self.status = SolveStatus::Unsatisfiable;
        }
        Ok(self.status)
    }

    /// Model value of an external variable. Valid after a satisfiable
    /// solve; ids beyond the model read as false.
    pub fn value(&self, id: i32) -> bool {
        self.model
            .get(id.unsigned_abs() as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Whether the given assumption literal was part of the failed
    /// set of the last unsatisfiable solve.
    pub fn failed_assumption(&self, lit: i32) -> bool {
        if self.status != SolveStatus::Unsatisfiable {
            return false;
        }
        let index = lit.unsigned_abs() as usize;
        match index.checked_sub(1).and_then(|i| self.vars.get(i)) {
            Some(var) => self.core_vars.contains(&var.index()),
            None => false,
        }
    }

    /// The failed assumptions of the last unsatisfiable solve, in
    /// submission order.
    pub fn failed_assumptions(&self) -> Vec<i32> {
        self.last_assumed
            .iter()
            .copied()
            .filter(|&l| self.failed_assumption(l))
            .collect()
    }

    /// Write the clausal core of the last unsatisfiable solve as
    /// DIMACS CNF: the original clauses whose selectors the engine
    /// reported as failed, in insertion order.
    pub fn write_clausal_core<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let kept: Vec<&Vec<i32>> = self
            .selectors
            .iter()
            .zip(&self.clauses)
            .filter(|(selector, _)| self.core_vars.contains(&selector.index()))
            .map(|(_, clause)| clause)
            .collect();

        writeln!(out, "c clausal core over {} original clauses", self.clauses.len())?;
        writeln!(out, "p cnf {} {}", self.vars.len(), kept.len())?;
        for clause in kept {
            for l in clause {
                write!(out, "{} ", l)?;
            }
            writeln!(out, "0")?;
        }
        Ok(())
    }

    fn reserve_vars(&mut self, count: usize) {
        while self.vars.len() < count {
            let var = self.engine.new_var();
            self.vars.push(var);
            self.ext_ids.push(self.vars.len() as i32);
        }
    }

    fn lit(&mut self, lit: i32) -> Lit {
        self.reserve_vars(lit.unsigned_abs() as usize);
        let var = self.vars[lit.unsigned_abs() as usize - 1];
        var.lit(lit > 0)
    }

    fn run(&mut self, assumps: &[Lit]) -> Result<bool> {
        self.engine.assume(assumps);
        self.engine
            .solve()
            .map_err(|e| ResolverError::Engine(e.to_string()))
    }

    /// Refine the engine's model to the lexicographically least one in
    /// id order: freeze each variable at false when a model without it
    /// exists, re-solving only for variables the engine left true.
    fn minimize(&mut self, mut base: Vec<Lit>) -> Result<()> {
        let mut model = self.read_model();
        let pinned: HashSet<usize> = base[self.selectors.len()..]
            .iter()
            .map(|l| l.var().index())
            .collect();

        for id in 1..=self.vars.len() {
            let var = self.vars[id - 1];
            if pinned.contains(&var.index()) {
                continue;
            }
            if !model[id] {
                base.push(var.negative());
                continue;
            }
            base.push(var.negative());
            if self.run(&base)? {
                model = self.read_model();
            } else {
                base.pop();
                base.push(var.positive());
            }
        }

        self.model = model;
        Ok(())
    }

    fn read_model(&self) -> Vec<bool> {
        let mut model = vec![false; self.vars.len() + 1];
        if let Some(assignment) = self.engine.model() {
            for lit in assignment {
                if !lit.is_positive() {
                    continue;
                }
                let ext = self.ext_ids[lit.var().index()];
                if ext > 0 {
                    model[ext as usize] = true;
                }
            }
        }
        model
    }
}
