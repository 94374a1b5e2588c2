//! Root finding for scalar functions.

/// Find every sign change of `f` between consecutive points of `grid`.
///
/// Returns the bracketing intervals `(lo, hi)` in grid order. A grid point where `f` is exactly
/// zero is returned as the degenerate bracket `(x, x)`.
///
/// # Example
/// ```
/// use rsebm_core::utils::root_finding::bracket_roots;
///
/// let grid = [-2.0, -0.5, 0.5, 2.0];
/// let brackets = bracket_roots(|x: f64| x * x - 1.0, &grid);
/// assert_eq!(brackets, vec![(-2.0, -0.5), (0.5, 2.0)]);
/// ```
pub fn bracket_roots<F>(f: F, grid: &[f64]) -> Vec<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let values: Vec<f64> = grid.iter().map(|x| f(*x)).collect();
    let mut brackets = Vec::new();

    for i in 0..grid.len() {
        if values[i] == 0.0 {
            brackets.push((grid[i], grid[i]));
            continue;
        }
        if i + 1 < grid.len() && values[i + 1] != 0.0 && values[i].signum() != values[i + 1].signum()
        {
            brackets.push((grid[i], grid[i + 1]));
        }
    }
    brackets
}

/// Locate a root of `f` inside `[lo, hi]` by bisection.
///
/// Returns `None` if `f(lo)` and `f(hi)` have the same sign or either is not finite.
///
/// # Arguments
/// * `f` - Continuous function
/// * `lo`, `hi` - Bracket with a sign change
/// * `tolerance` - Width of the bracket at which to stop
/// * `max_iterations` - Upper bound on the number of halvings
pub fn bisect<F>(f: F, lo: f64, hi: f64, tolerance: f64, max_iterations: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = (lo.min(hi), lo.max(hi));
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !f_lo.is_finite() || !f_hi.is_finite() {
        return None;
    }
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return None;
    }

    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) < tolerance {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Some(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisect_sqrt_two() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 200).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_bisect_reversed_bracket() {
        let root = bisect(|x| x - 0.25, 1.0, 0.0, 1e-12, 200).unwrap();
        assert!((root - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_bisect_without_sign_change() {
        assert_eq!(bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-12, 200), None);
        assert_eq!(bisect(|_| f64::NAN, -1.0, 1.0, 1e-12, 200), None);
    }

    #[test]
    fn test_bracket_cubic() {
        // (x + 1) x (x - 1) has three roots, one of them on a grid point
        let grid = [-1.5, -0.5, 0.0, 0.5, 1.5];
        let brackets = bracket_roots(|x| (x + 1.0) * x * (x - 1.0), &grid);
        assert_eq!(brackets, vec![(-1.5, -0.5), (0.0, 0.0), (0.5, 1.5)]);
    }
}
