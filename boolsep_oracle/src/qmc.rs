use boolsep_collections::Point;
use boolsep_constraints::AndClause;
use hashbrown::HashSet;

/// A cube over `{0,1}^n`: `-1` marks a wildcard coordinate, `0`/`1` a fixed one.
type Cube = Vec<i8>;

/// Enumerate all maximal Boolean cubes contained in `target` (spec.md §4.C's
/// Quine-McCluskey bulk step), by the classical prime-implicant merge: start
/// from the singleton cubes (one per point of `target`), repeatedly merge
/// pairs differing in exactly one fixed coordinate and sharing every other
/// coordinate (wildcard or value), and keep every cube that was never
/// consumed by a merge at its level. This enumerates *all* primes; choosing a
/// minimum covering sub-family is the subset selector's job (spec.md §4.G),
/// not this step's.
pub fn quine_mccluskey_maximal_cubes(n: usize, target: &[Point]) -> Vec<AndClause> {
    let mut current: Vec<Cube> = target.iter().map(|p| p.iter().map(|b| b as i8).collect()).collect();
    current.sort();
    current.dedup();

    let mut primes: HashSet<Cube> = HashSet::new();

    loop {
        let mut used = vec![false; current.len()];
        let mut next_set: HashSet<Cube> = HashSet::new();

        for i in 0..current.len() {
            for j in (i + 1)..current.len() {
                if let Some(merged) = try_merge(&current[i], &current[j]) {
                    used[i] = true;
                    used[j] = true;
                    next_set.insert(merged);
                }
            }
        }

        for (term, &is_used) in current.iter().zip(used.iter()) {
            if !is_used {
                primes.insert(term.clone());
            }
        }

        if next_set.is_empty() {
            break;
        }
        current = next_set.into_iter().collect();
        current.sort();
    }

    debug_assert!(n == 0 || current.first().map(|c| c.len()).unwrap_or(n) == n);
    primes.into_iter().map(|term| cube_to_and_clause(&term)).collect()
}

fn try_merge(a: &Cube, b: &Cube) -> Option<Cube> {
    let mut diff_at = None;
    for i in 0..a.len() {
        if a[i] == -1 || b[i] == -1 {
            if a[i] != b[i] {
                return None;
            }
            continue;
        }
        if a[i] != b[i] {
            if diff_at.is_some() {
                return None;
            }
            diff_at = Some(i);
        }
    }
    let i = diff_at?;
    let mut merged = a.clone();
    merged[i] = -1;
    Some(merged)
}

fn cube_to_and_clause(term: &Cube) -> AndClause {
    let literals = term
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| match b {
            0 => Some(-(i as i32 + 1)),
            1 => Some(i as i32 + 1),
            _ => None,
        })
        .collect();
    AndClause::new(literals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_adjacent_minterms_into_single_cube() {
        // target = {(0,0),(0,1)} = the cube x0=0 (x1 free).
        let target = vec![Point::new(vec![0, 0]), Point::new(vec![0, 1])];
        let cubes = quine_mccluskey_maximal_cubes(2, &target);
        assert_eq!(cubes.len(), 1);
        assert_eq!(cubes[0].literals(), &[-1]);
    }

    #[test]
    fn keeps_disjoint_minterms_as_separate_primes_on_xor() {
        // target = EXCLUDE of XOR = {(0,0),(1,1)}; neither merges with the other.
        let target = vec![Point::new(vec![0, 0]), Point::new(vec![1, 1])];
        let cubes = quine_mccluskey_maximal_cubes(2, &target);
        assert_eq!(cubes.len(), 2);
        for c in &cubes {
            assert_eq!(c.literals().len(), 2);
        }
    }

    #[test]
    fn every_cube_solution_lies_within_target() {
        let target = vec![
            Point::new(vec![0, 0, 0]),
            Point::new(vec![0, 0, 1]),
            Point::new(vec![1, 1, 0]),
        ];
        let cubes = quine_mccluskey_maximal_cubes(3, &target);
        for cube in &cubes {
            let sols = cube.solutions(3);
            for v in sols.ones() {
                let bits: Vec<u8> = (0..3).map(|i| ((v >> (2 - i)) & 1) as u8).collect();
                let p = Point::new(bits);
                assert!(target.contains(&p));
            }
        }
    }
}
