use crate::LowerSetLearner;
use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::{AndClause, Constraint, Inequality, OrClause, Subspace};
use boolsep_precision::ExtraPrecision;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

const MAGIC: &str = "boolsep-learner v1";

#[derive(Debug, thiserror::Error)]
pub enum LearnerError {
    #[error("i/o error accessing persistence file: {0}")]
    Io(#[from] io::Error),
    #[error("corrupted persistence file: {0}")]
    Corrupted(String),
}

/// Pipes `data` through an external `bzip2` subprocess (spec.md §6's
/// "compressed text" persistence format, §6's external-process list), the
/// same process-invocation-by-name-on-PATH convention used for the
/// set-covering solver in `boolsep_pool::SubsetSelector`. Writes on a
/// separate thread to avoid deadlocking against the child's own stdout
/// buffer for larger states.
fn pipe_through(program: &str, args: &[&str], data: &[u8]) -> Result<Vec<u8>, LearnerError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    let mut stdin = child.stdin.take().expect("piped stdin");
    let owned = data.to_vec();
    let writer = std::thread::spawn(move || {
        let _ = stdin.write_all(&owned);
    });
    let output = child.wait_with_output()?;
    writer.join().expect("bzip2 stdin writer thread panicked");
    if !output.status.success() {
        return Err(LearnerError::Corrupted(format!("{program} exited with {:?}", output.status)));
    }
    Ok(output.stdout)
}

fn bzip2_compress(data: &[u8]) -> Result<Vec<u8>, LearnerError> {
    pipe_through("bzip2", &["-z", "-c"], data)
}

fn bzip2_decompress(data: &[u8]) -> Result<Vec<u8>, LearnerError> {
    pipe_through("bzip2", &["-d", "-c"], data)
}

pub fn save(learner: &LowerSetLearner, path: &Path) -> Result<(), LearnerError> {
    let mut out = String::new();
    out.push_str(MAGIC);
    out.push('\n');
    out.push_str(&format!("n {}\n", learner.n));
    out.push_str(&format!(
        "complete_lower {} complete_upper {}\n",
        learner.is_complete_lower as u8, learner.is_complete_upper as u8
    ));

    out.push_str(&format!("LOWER {}\n", learner.lower.len()));
    for s in learner.iter_lower() {
        let cons = learner.meta.get(s).expect("every lower element has a witness");
        out.push_str(&fset_text(s));
        out.push('|');
        out.push_str(&constraint_to_text(cons));
        out.push('\n');
    }

    out.push_str(&format!("UPPER {}\n", learner.upper.len()));
    for s in learner.iter_upper() {
        out.push_str(&fset_text(s));
        out.push('\n');
    }

    fs::write(path, bzip2_compress(out.as_bytes())?)?;
    Ok(())
}

pub fn load(path: &Path, extra_prec: Arc<dyn ExtraPrecision>) -> Result<LowerSetLearner, LearnerError> {
    let compressed = fs::read(path)?;
    let decompressed = bzip2_decompress(&compressed)?;
    let text = String::from_utf8(decompressed)
        .map_err(|e| LearnerError::Corrupted(format!("decompressed state is not valid utf-8: {e}")))?;
    let mut lines = text.lines();

    let magic = lines.next().ok_or_else(|| LearnerError::Corrupted("empty file".into()))?;
    if magic != MAGIC {
        return Err(LearnerError::Corrupted(format!("unexpected header {magic:?}")));
    }

    let n_line = lines.next().ok_or_else(|| LearnerError::Corrupted("missing n".into()))?;
    let n: usize = n_line
        .strip_prefix("n ")
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| LearnerError::Corrupted(format!("bad n line {n_line:?}")))?;

    let flags_line = lines.next().ok_or_else(|| LearnerError::Corrupted("missing flags".into()))?;
    let flags: Vec<&str> = flags_line.split_whitespace().collect();
    if flags.len() != 4 || flags[0] != "complete_lower" || flags[2] != "complete_upper" {
        return Err(LearnerError::Corrupted(format!("bad flags line {flags_line:?}")));
    }
    let is_complete_lower = flags[1] == "1";
    let is_complete_upper = flags[3] == "1";

    let mut learner = LowerSetLearner::new(n, extra_prec);
    learner.is_complete_lower = is_complete_lower;
    learner.is_complete_upper = is_complete_upper;

    let lower_header = lines.next().ok_or_else(|| LearnerError::Corrupted("missing LOWER header".into()))?;
    let n_lower: usize = lower_header
        .strip_prefix("LOWER ")
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| LearnerError::Corrupted(format!("bad LOWER header {lower_header:?}")))?;
    for _ in 0..n_lower {
        let line = lines.next().ok_or_else(|| LearnerError::Corrupted("truncated LOWER section".into()))?;
        let (fset_part, cons_part) =
            line.split_once('|').ok_or_else(|| LearnerError::Corrupted(format!("bad lower line {line:?}")))?;
        let fset = parse_fset(fset_part)?;
        let cons = constraint_from_text(cons_part, n)?;
        learner.lower.push(fset.clone());
        learner.meta.insert(fset, cons);
    }

    let upper_header = lines.next().ok_or_else(|| LearnerError::Corrupted("missing UPPER header".into()))?;
    let n_upper: usize = upper_header
        .strip_prefix("UPPER ")
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| LearnerError::Corrupted(format!("bad UPPER header {upper_header:?}")))?;
    for _ in 0..n_upper {
        let line = lines.next().ok_or_else(|| LearnerError::Corrupted("truncated UPPER section".into()))?;
        learner.upper.push(parse_fset(line)?);
    }

    Ok(learner)
}

fn fset_text(s: &SparseIndexSet) -> String {
    s.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

fn parse_fset(text: &str) -> Result<SparseIndexSet, LearnerError> {
    if text.is_empty() {
        return Ok(SparseIndexSet::new());
    }
    let mut idxs = Vec::new();
    for tok in text.split(',') {
        idxs.push(tok.parse::<u32>().map_err(|_| LearnerError::Corrupted(format!("bad index {tok:?}")))?);
    }
    Ok(SparseIndexSet::from_iter(idxs))
}

fn point_text(p: &Point) -> String {
    p.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(",")
}

fn parse_point(text: &str) -> Result<Point, LearnerError> {
    let mut bits = Vec::new();
    for tok in text.split(',') {
        bits.push(tok.parse::<u8>().map_err(|_| LearnerError::Corrupted(format!("bad bit {tok:?}")))?);
    }
    Ok(Point::new(bits))
}

fn constraint_to_text(c: &Constraint) -> String {
    match c {
        Constraint::Inequality(ineq) => {
            let coeffs = ineq.coeffs().iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",");
            format!("INEQ {};{}", coeffs, ineq.constant())
        }
        Constraint::OrClause(c) => {
            format!("OR {}", c.literals().iter().map(|l| l.to_string()).collect::<Vec<_>>().join(","))
        }
        Constraint::AndClause(c) => {
            format!("AND {}", c.literals().iter().map(|l| l.to_string()).collect::<Vec<_>>().join(","))
        }
        Constraint::Subspace(s) => {
            let mut parts = vec![point_text(s.offset())];
            parts.extend(s.basis().iter().map(point_text));
            format!("SUB {}", parts.join(";"))
        }
    }
}

fn constraint_from_text(text: &str, n: usize) -> Result<Constraint, LearnerError> {
    let (tag, payload) =
        text.split_once(' ').ok_or_else(|| LearnerError::Corrupted(format!("bad constraint text {text:?}")))?;
    match tag {
        "INEQ" => {
            let (coeffs_part, c_part) = payload
                .split_once(';')
                .ok_or_else(|| LearnerError::Corrupted(format!("bad INEQ payload {payload:?}")))?;
            let coeffs: Vec<f64> = if coeffs_part.is_empty() {
                Vec::new()
            } else {
                coeffs_part
                    .split(',')
                    .map(|t| t.parse::<f64>().map_err(|_| LearnerError::Corrupted(format!("bad coeff {t:?}"))))
                    .collect::<Result<_, _>>()?
            };
            let c: f64 = c_part.parse().map_err(|_| LearnerError::Corrupted(format!("bad constant {c_part:?}")))?;
            Ok(Constraint::from(Inequality::new(coeffs, c)))
        }
        "OR" | "AND" => {
            let lits: Vec<i32> = if payload.is_empty() {
                Vec::new()
            } else {
                payload
                    .split(',')
                    .map(|t| t.parse::<i32>().map_err(|_| LearnerError::Corrupted(format!("bad literal {t:?}"))))
                    .collect::<Result<_, _>>()?
            };
            if tag == "OR" {
                Ok(Constraint::from(OrClause::new(lits)))
            } else {
                Ok(Constraint::from(AndClause::new(lits)))
            }
        }
        "SUB" => {
            let mut points = payload.split(';').map(parse_point);
            let offset = points.next().ok_or_else(|| LearnerError::Corrupted("SUB missing offset".into()))??;
            let basis: Vec<Point> = points.collect::<Result<_, _>>()?;
            debug_assert_eq!(offset.n(), n);
            Ok(Constraint::from(Subspace::new(offset, basis)))
        }
        other => Err(LearnerError::Corrupted(format!("unknown constraint tag {other:?}"))),
    }
}
