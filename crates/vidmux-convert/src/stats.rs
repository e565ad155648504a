//! Batch result aggregation.

use std::time::Duration;

use serde::Serialize;

use crate::engine::ConversionResult;

/// Summary statistics over a batch of conversion results.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStats {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage in `[0, 100]`; `0.0` for an empty batch.
    pub success_rate: f64,
    /// Sum of processing times over successful conversions.
    #[serde(serialize_with = "serialize_secs")]
    pub total_processing_time: Duration,
    /// Mean time per successful conversion; zero when none succeeded.
    #[serde(serialize_with = "serialize_secs")]
    pub average_time_per_file: Duration,
}

fn serialize_secs<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(d.as_secs_f64())
}

/// Reduce a sequence of per-file results into summary statistics.
///
/// The input is neither mutated nor reordered. Skipped no-op conversions
/// count as successes; only results carrying a processing time contribute to
/// the time totals.
pub fn summarize(results: &[ConversionResult]) -> BatchStats {
    let total_files = results.len();
    let successful = results.iter().filter(|r| r.success).count();
    let failed = total_files - successful;

    let total_processing_time = results
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| r.processing_time)
        .sum::<Duration>();

    let success_rate = if total_files == 0 {
        0.0
    } else {
        successful as f64 / total_files as f64 * 100.0
    };

    let average_time_per_file = if successful == 0 {
        Duration::ZERO
    } else {
        total_processing_time / successful as u32
    };

    BatchStats {
        total_files,
        successful,
        failed,
        success_rate,
        total_processing_time,
        average_time_per_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn ok(secs: u64) -> ConversionResult {
        ConversionResult::completed(
            Path::new("in.avi"),
            PathBuf::from("out.mp4"),
            Duration::from_secs(secs),
        )
    }

    fn fail() -> ConversionResult {
        ConversionResult::failed(Path::new("in.avi"), "conversion failed".into())
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.successful, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.total_processing_time, Duration::ZERO);
        assert_eq!(stats.average_time_per_file, Duration::ZERO);
    }

    #[test]
    fn counts_always_add_up() {
        let stats = summarize(&[ok(2), fail(), ok(4)]);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.successful + stats.failed, stats.total_files);
        assert!((stats.success_rate - 2.0 / 3.0 * 100.0).abs() < 1e-9);
        assert!(stats.success_rate >= 0.0 && stats.success_rate <= 100.0);
    }

    #[test]
    fn averages_only_over_successes() {
        let stats = summarize(&[ok(2), ok(4), fail()]);
        assert_eq!(stats.total_processing_time, Duration::from_secs(6));
        assert_eq!(stats.average_time_per_file, Duration::from_secs(3));
    }

    #[test]
    fn all_failures_average_zero() {
        let stats = summarize(&[fail(), fail()]);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_time_per_file, Duration::ZERO);
    }

    #[test]
    fn skips_count_as_successes_without_time() {
        let skip = ConversionResult::skipped(Path::new("clip.mp4"), "already mp4".into());
        let stats = summarize(&[skip, ok(2)]);
        assert_eq!(stats.successful, 2);
        assert_eq!(stats.total_processing_time, Duration::from_secs(2));
        // Average divides by successes, including the timeless skip.
        assert_eq!(stats.average_time_per_file, Duration::from_secs(1));
    }

    #[test]
    fn input_order_is_untouched() {
        let results = vec![fail(), ok(1)];
        let _ = summarize(&results);
        assert!(!results[0].success);
        assert!(results[1].success);
    }
}
