//! Monthly activity metrics for the analytics tab.
//!
//! Pull requests and issues are grouped into calendar-month buckets covering a
//! trailing window that ends with the current month. Each bucket yields three
//! values: mean merge time, mean issue resolution time and review efficiency.
//! Values are `None` when the bucket has nothing to measure so charts can leave
//! a gap instead of drawing a zero.

use crate::github::{Issue, IssueState, PrState, PullRequest};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

/// Months shown when the config does not say otherwise.
pub const DEFAULT_WINDOW_MONTHS: u32 = 6;

/// Largest window the config accepts (ten years).
pub const MAX_WINDOW_MONTHS: u32 = 120;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One calendar month of activity.
#[derive(Debug, Clone)]
pub struct MonthBucket<'a> {
    /// Label such as "Jan 2024"
    pub label: String,
    /// First day of the month
    pub start: NaiveDate,
    /// Last day of the month
    pub end: NaiveDate,
    /// Pull requests created in this month
    pub pull_requests: Vec<&'a PullRequest>,
    /// Issues created in this month
    pub issues: Vec<&'a Issue>,
    /// `year * 12 + month0`
    key: i64,
}

/// Per-bucket counts shown under the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketCounts {
    pub pull_requests: usize,
    pub merged: usize,
    pub issues: usize,
    pub closed_issues: usize,
}

/// Chart-ready series, one entry per month, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyMetrics {
    pub labels: Vec<String>,
    /// Mean days from creation to merge
    pub pr_merge_time: Vec<Option<f64>>,
    /// Mean days from creation to close
    pub issue_resolution_time: Vec<Option<f64>>,
    /// Merged PRs as a percentage of all PRs, one decimal
    pub review_efficiency: Vec<Option<f64>>,
    pub counts: Vec<BucketCounts>,
}

/// Averages of each series across months that have a value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSummary {
    pub avg_merge_time: Option<f64>,
    pub avg_resolution_time: Option<f64>,
    pub avg_review_efficiency: Option<f64>,
}

fn month_key(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn month_start(key: i64) -> Option<NaiveDate> {
    let year = i32::try_from(key.div_euclid(12)).ok()?;
    let month = u32::try_from(key.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Build empty buckets for the `window_months` months ending with `now`'s month.
///
/// # Details
/// The end of each month is the day before the first of the next month.
pub fn month_buckets<'a>(window_months: u32, now: DateTime<Utc>) -> Vec<MonthBucket<'a>> {
    let current = month_key(now.date_naive());
    let window = i64::from(window_months);

    (0..window)
        .filter_map(|i| {
            let key = current - (window - 1 - i);
            let start = month_start(key)?;
            let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
            Some(MonthBucket {
                label: start.format("%b %Y").to_string(),
                start,
                end,
                pull_requests: Vec::new(),
                issues: Vec::new(),
                key,
            })
        })
        .collect()
}

/// Index of the bucket `created` falls into.
///
/// # Details
/// Direct month-index lookup. Items without a creation date, created after
/// `now`, or older than the first bucket are not assigned.
fn bucket_index(
    buckets: &[MonthBucket<'_>],
    created: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<usize> {
    let created = created.filter(|c| *c <= now)?;
    let first = buckets.first()?.key;
    let day = created.date_naive();
    let offset = usize::try_from(month_key(day) - first).ok()?;
    buckets
        .get(offset)
        .filter(|bucket| (bucket.start..=bucket.end).contains(&day))
        .map(|_| offset)
}

/// Assign pull requests and issues to the trailing month buckets.
pub fn assign_to_buckets<'a>(
    pull_requests: &'a [PullRequest],
    issues: &'a [Issue],
    window_months: u32,
    now: DateTime<Utc>,
) -> Vec<MonthBucket<'a>> {
    let mut buckets = month_buckets(window_months, now);

    for pr in pull_requests {
        if let Some(idx) = bucket_index(&buckets, pr.created_at, now) {
            buckets[idx].pull_requests.push(pr);
        }
    }
    for issue in issues {
        if let Some(idx) = bucket_index(&buckets, issue.created_at, now) {
            buckets[idx].issues.push(issue);
        }
    }

    buckets
}

fn elapsed_days(created: Option<DateTime<Utc>>, closed: Option<DateTime<Utc>>) -> Option<f64> {
    let (created, closed) = (created?, closed?);
    Some((closed - created).num_seconds() as f64 / SECONDS_PER_DAY)
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl MonthBucket<'_> {
    /// Mean days to merge over merged PRs, `None` when none merged.
    pub fn merge_time(&self) -> Option<f64> {
        mean(
            self.pull_requests
                .iter()
                .filter(|pr| pr.state == PrState::Merged)
                .filter_map(|pr| elapsed_days(pr.created_at, pr.closed_at)),
        )
    }

    /// Mean days to close over closed issues, `None` when none closed.
    pub fn resolution_time(&self) -> Option<f64> {
        mean(
            self.issues
                .iter()
                .filter(|issue| issue.state == IssueState::Closed)
                .filter_map(|issue| elapsed_days(issue.created_at, issue.closed_at)),
        )
    }

    /// Percentage of PRs in the bucket that were merged, `None` without PRs.
    ///
    /// Open PRs count toward the total.
    pub fn review_efficiency(&self) -> Option<f64> {
        let counts = self.counts();
        if counts.pull_requests == 0 {
            return None;
        }
        Some(round_one_decimal(
            counts.merged as f64 / counts.pull_requests as f64 * 100.0,
        ))
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            pull_requests: self.pull_requests.len(),
            merged: self
                .pull_requests
                .iter()
                .filter(|pr| pr.state == PrState::Merged)
                .count(),
            issues: self.issues.len(),
            closed_issues: self
                .issues
                .iter()
                .filter(|issue| issue.state == IssueState::Closed)
                .count(),
        }
    }
}

/// Compute the monthly series shown in the analytics tab.
///
/// # Arguments
/// * `pull_requests` - Pull requests from the current snapshot
/// * `issues` - Issues from the current snapshot
/// * `window_months` - Number of months, ending with the current one
/// * `now` - Reference time; items created later are ignored
///
/// # Returns
/// * `MonthlyMetrics` - Parallel series, oldest month first
pub fn compute_monthly_metrics(
    pull_requests: &[PullRequest],
    issues: &[Issue],
    window_months: u32,
    now: DateTime<Utc>,
) -> MonthlyMetrics {
    let buckets = assign_to_buckets(pull_requests, issues, window_months, now);

    let mut metrics = MonthlyMetrics::default();
    for bucket in &buckets {
        metrics.labels.push(bucket.label.clone());
        metrics.pr_merge_time.push(bucket.merge_time());
        metrics.issue_resolution_time.push(bucket.resolution_time());
        metrics.review_efficiency.push(bucket.review_efficiency());
        metrics.counts.push(bucket.counts());
    }

    tracing::debug!(
        "Computed metrics for {} months ({} PRs, {} issues in window)",
        buckets.len(),
        metrics.counts.iter().map(|c| c.pull_requests).sum::<usize>(),
        metrics.counts.iter().map(|c| c.issues).sum::<usize>()
    );

    metrics
}

/// Mean of the non-null entries of a series.
pub fn series_mean(series: &[Option<f64>]) -> Option<f64> {
    mean(series.iter().flatten().copied()).filter(|v| v.is_finite())
}

impl MonthlyMetrics {
    /// Summary cards for the analytics tab.
    pub fn summary(&self) -> MetricSummary {
        MetricSummary {
            avg_merge_time: series_mean(&self.pr_merge_time),
            avg_resolution_time: series_mean(&self.issue_resolution_time),
            avg_review_efficiency: series_mean(&self.review_efficiency),
        }
    }

    /// Whether no month has any value to plot.
    pub fn is_empty(&self) -> bool {
        self.pr_merge_time
            .iter()
            .chain(&self.issue_resolution_time)
            .chain(&self.review_efficiency)
            .all(Option::is_none)
    }
}

/// Format a metric for display, "N/A" when absent.
pub fn format_metric(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}{}", v, suffix),
        _ => "N/A".to_string(),
    }
}
