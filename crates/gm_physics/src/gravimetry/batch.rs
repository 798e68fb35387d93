// crates/gm_physics/src/gravimetry/batch.rs

//! 测点批量求值
//!
//! 每个测点独立累加，结果顺序与输入一致。

use super::response::{FieldSample, GravityResponse};
use gm_foundation::error::GmResult;

/// 对每个测点调用 `kernel`，并检查结果有限
pub(crate) fn evaluate_points<P, F>(
    points: &[P],
    parallel: bool,
    kernel: F,
) -> GmResult<GravityResponse>
where
    P: Sync,
    F: Fn(&P) -> FieldSample + Sync + Send,
{
    let samples = map_points(points, parallel, &kernel);
    let response = GravityResponse::from_samples(samples);
    response.check_finite()?;
    Ok(response)
}

#[cfg(feature = "parallel")]
fn map_points<P, F>(points: &[P], parallel: bool, kernel: &F) -> Vec<FieldSample>
where
    P: Sync,
    F: Fn(&P) -> FieldSample + Sync + Send,
{
    use rayon::prelude::*;
    if parallel {
        points.par_iter().map(kernel).collect()
    } else {
        points.iter().map(kernel).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_points<P, F>(points: &[P], _parallel: bool, kernel: &F) -> Vec<FieldSample>
where
    P: Sync,
    F: Fn(&P) -> FieldSample + Sync + Send,
{
    points.iter().map(kernel).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_foundation::GmError;

    #[test]
    fn test_order_is_preserved() {
        let points: Vec<f64> = (0..257).map(|i| i as f64).collect();
        for parallel in [true, false] {
            let r = evaluate_points(&points, parallel, |&x| {
                FieldSample::new([x, 0.0, -x], [0.0; 3])
            })
            .unwrap();
            assert_eq!(r.gx(), points);
        }
    }

    #[test]
    fn test_non_finite_aborts_batch() {
        let points = [1.0, 0.0, 2.0];
        let r = evaluate_points(&points, false, |&x: &f64| {
            FieldSample::new([1.0 / x, 0.0, 0.0], [0.0; 3])
        });
        assert!(matches!(r, Err(GmError::NonFinite { .. })));
    }
}
