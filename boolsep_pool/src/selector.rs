use crate::error::PoolError;
use crate::pool::ConstraintPool;
use boolsep_constraints::Constraint;
use good_lp::{variable, Expression, ProblemVariables, Solution, SolverModel};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Picks a small subset of a finalized `ConstraintPool`'s constraints that
/// jointly refutes every EXCLUDE point (spec.md §4.G): an exact MILP set
/// cover, or an external `setcoveringsolver`-style subprocess for instances
/// too large for the bundled solver.
pub struct SubsetSelector<'a> {
    pool: &'a mut ConstraintPool,
}

impl<'a> SubsetSelector<'a> {
    pub fn new(pool: &'a mut ConstraintPool) -> Self {
        SubsetSelector { pool }
    }

    /// Exact minimum set cover via binary MILP: one `v_take_i` per
    /// constraint, one cover row per EXCLUDE point, minimize the count of
    /// taken constraints. Mirrors the source's `create_subset_milp`.
    pub fn select_by_milp(&mut self) -> Result<Vec<usize>, PoolError> {
        let n_exc = self.pool.i2exc().len();
        let constraints = self.pool.constraints()?;
        let n_cons = constraints.len();

        let mut vars = ProblemVariables::new();
        let take: Vec<_> = (0..n_cons).map(|_| vars.add(variable().binary())).collect();

        let mut by_bad: Vec<Vec<usize>> = vec![Vec::new(); n_exc];
        for (i, c) in constraints.iter().enumerate() {
            for q in c.fset.iter() {
                by_bad[q as usize].push(i);
            }
        }

        let obj: Expression = take.iter().fold(Expression::from(0.0), |acc, &v| acc + v);

        let mut problem = vars.minimise(obj.clone()).using(good_lp::default_solver);
        for lst in &by_bad {
            if lst.is_empty() {
                return Err(PoolError::InsufficientPool);
            }
            let row: Expression = lst.iter().fold(Expression::from(0.0), |acc, &i| acc + take[i]);
            problem.add_constraint(row.geq(1.0));
        }
        if self.pool.best_subset_size_ub < usize::MAX {
            problem.add_constraint(obj.leq(self.pool.best_subset_size_ub as f64));
        }

        let solution = problem.solve().map_err(|_| PoolError::InsufficientPool)?;

        let mut chosen = Vec::new();
        for (i, &v) in take.iter().enumerate() {
            let val = solution.value(v);
            assert!((val - val.round()).abs() <= 1e-4, "non-integral milp solution? value {val}");
            if val.round() as i64 == 1 {
                chosen.push(i);
            }
        }

        self.report(&chosen, "select_by_milp", true);
        Ok(chosen)
    }

    /// Writes the `.gecco` unicost set-cover instance format: header line
    /// `n_var n_sets`, then one line per EXCLUDE point listing the
    /// constraint indices covering it.
    pub fn write_subset_gecco(&self, path: impl AsRef<Path>) -> Result<(), PoolError> {
        if path.as_ref().exists() {
            tracing::warn!(path = %path.as_ref().display(), "refusing to overwrite existing gecco file, keeping it");
            return Err(PoolError::OverwriteAttempt(path.as_ref().to_path_buf()));
        }

        let n_var = self.pool.i2exc().len();
        let constraints = self.pool.constraints()?;

        let mut by_bad: Vec<Vec<usize>> = vec![Vec::new(); n_var];
        for (set_i, c) in constraints.iter().enumerate() {
            for q in c.fset.iter() {
                by_bad[q as usize].push(set_i);
            }
        }

        let mut f = std::fs::File::create(path)?;
        writeln!(f, "{} {}", n_var, constraints.len())?;
        for (pti, lst) in by_bad.iter().enumerate() {
            assert!(!lst.is_empty(), "no solutions");
            write!(f, "{} {}", pti, lst.len())?;
            for i in lst {
                write!(f, " {}", i)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    /// Writes the `.meta` side file: one line per constraint with its index,
    /// covered-point fset, reoriented witness, and whether it was
    /// pre-selected.
    pub fn write_subset_meta(&self, path: impl AsRef<Path>, pre_selected: &[usize]) -> Result<(), PoolError> {
        if path.as_ref().exists() {
            tracing::warn!(path = %path.as_ref().display(), "refusing to overwrite existing meta file, keeping it");
            return Err(PoolError::OverwriteAttempt(path.as_ref().to_path_buf()));
        }

        let constraints = self.pool.constraints()?;
        let mut f = std::fs::File::create(path)?;
        for (i, c) in constraints.iter().enumerate() {
            let fset_str: Vec<String> = c.fset.iter().map(|x| x.to_string()).collect();
            write!(f, "{} {} {} {}", i, fset_str.join(":"), constraint_text(&c.final_), pre_selected.contains(&i) as u8)?;
            writeln!(f)?;
        }
        Ok(())
    }

    /// Runs an external set-cover solver binary against a just-written
    /// `.gecco` instance, parses back a `<count>\n<idx idx ...>` certificate,
    /// and tolerates timeout/corruption as a non-fatal, empty-report
    /// outcome (spec.md §7).
    pub fn select_by_external(
        &mut self,
        binary: &str,
        gecco_path: impl AsRef<Path>,
        sol_path: impl AsRef<Path>,
        timeout: Duration,
        algorithm: &str,
        seed: u64,
    ) -> Result<Option<Vec<usize>>, PoolError> {
        let cmd = [
            binary.to_string(),
            "--algorithm".into(),
            algorithm.into(),
            "--input".into(),
            gecco_path.as_ref().display().to_string(),
            "--unicost".into(),
            "--time-limit".into(),
            timeout.as_secs().to_string(),
            "--certificate".into(),
            sol_path.as_ref().display().to_string(),
            "--seed".into(),
            seed.to_string(),
        ];
        tracing::info!(cmd = ?cmd, "spawning external set-cover solver");

        let mut child = Command::new(&cmd[0])
            .args(&cmd[1..])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + timeout + Duration::from_secs(5);
        loop {
            if let Some(status) = child.try_wait()? {
                tracing::info!(?status, "external solver exited");
                break;
            }
            if Instant::now() >= deadline {
                tracing::error!("external solver timed out, killing");
                let _ = child.kill();
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        let sol = match self.parse_solution_file(sol_path.as_ref()) {
            Ok(sol) => sol,
            Err(_) => {
                tracing::warn!("corrupted solution file from external solver");
                return Ok(None);
            }
        };

        self.report(&sol, &format!("select_by_external:{algorithm},timeout={timeout:?},seed={seed}"), false);
        Ok(Some(sol))
    }

    fn parse_solution_file(&self, path: &Path) -> Result<Vec<usize>, PoolError> {
        let f = std::fs::File::open(path)?;
        let mut lines = BufReader::new(f).lines();
        let size_line = lines.next().ok_or_else(|| PoolError::CorruptedSolverOutput("empty file".into()))??;
        let size: usize = size_line
            .trim()
            .parse()
            .map_err(|_| PoolError::CorruptedSolverOutput(format!("bad size line {size_line:?}")))?;
        let sol_line = lines.next().ok_or_else(|| PoolError::CorruptedSolverOutput("missing solution line".into()))??;
        let sol: Vec<usize> = sol_line
            .split_whitespace()
            .map(|t| t.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| PoolError::CorruptedSolverOutput(format!("bad solution line {sol_line:?}")))?;
        if sol.len() != size {
            return Err(PoolError::CorruptedSolverOutput("size mismatch".into()));
        }
        Ok(sol)
    }

    /// Best-known-bound bookkeeping and artifact writing, mirroring
    /// `constraint_pool.py`'s `report`: a candidate is kept if it strictly
    /// improves the bound, or ties the bound while proving optimality the
    /// stored candidate lacked. When an output prefix is configured, writes
    /// `{prefix}{count}` (`.opt` suffix if proven optimal) plus a `.source`
    /// sidecar naming where the candidate came from; refuses to overwrite an
    /// existing artifact file, warning and keeping it instead (spec.md §7).
    fn report(&mut self, chosen: &[usize], source: &str, optimal: bool) {
        let size = chosen.len();
        tracing::info!(size, source, optimal, "subset selector result");

        let Some(prefix) = self.pool.output_prefix().map(|p| p.to_path_buf()) else {
            tracing::warn!("output prefix not set, not writing");
            return;
        };

        let accept = size < self.pool.best_subset_size_ub
            || (size == self.pool.best_subset_size_ub && optimal && !self.pool.best_subset_is_optimal);
        if !accept {
            tracing::info!(size, best = self.pool.best_subset_size_ub, "skipping non-improving subset");
            return;
        }
        self.pool.best_subset_size_ub = size;
        self.pool.best_subset = Some(chosen.to_vec());
        self.pool.best_subset_is_optimal = optimal;

        let mut filename = format!("{}{}", prefix.display(), size);
        if optimal {
            filename.push_str(".opt");
        }
        let filename = PathBuf::from(filename);
        let source_path = PathBuf::from(format!("{}.source", filename.display()));

        if let Err(e) = std::fs::write(&source_path, format!("{source}\n")) {
            tracing::error!(path = %source_path.display(), error = %e, "failed writing selector source sidecar");
        }

        if filename.exists() {
            tracing::warn!(path = %filename.display(), "selector artifact exists, skipping overwrite");
            return;
        }

        let texts: Vec<String> = match self.pool.constraints() {
            Ok(constraints) => chosen.iter().map(|&i| constraint_text(&constraints[i].final_)).collect(),
            Err(_) => Vec::new(),
        };
        let mut body = format!("{size}\n");
        for t in &texts {
            body.push_str(t);
            body.push('\n');
        }
        if let Err(e) = std::fs::write(&filename, body) {
            tracing::error!(path = %filename.display(), error = %e, "failed writing selector artifact");
        } else {
            tracing::info!(path = %filename.display(), size, "saved subset selector artifact");
        }
    }
}

fn constraint_text(c: &Constraint) -> String {
    format!("{c:?}")
}
