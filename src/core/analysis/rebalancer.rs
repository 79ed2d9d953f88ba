//! Dataset rebalancing by augmentation.
//!
//! Every class subdirectory is brought up to the largest class count. The
//! images a class is missing are spread evenly over its existing images; the
//! first images in sorted order absorb the remainder. Each image then gets one
//! augmentation request. Failed requests and unreadable classes are logged and
//! skipped, never fatal.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use super::balance_analyzer::{deficit, format_counts, target_count};
use crate::core::augmentation::Augment;
use crate::core::dataset::{count_table, error_chain, scan_class_dirs, ClassDir, CountTable};
use crate::core::error::DatasetError;

/// One augmentation request: derive `count` variants from `image_path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentRequest {
    pub image_path: PathBuf,
    pub count: usize,
}

/// What the workflow will do for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassAction {
    /// Already at the target count
    AlreadyBalanced,
    /// Short of the target but no source images to augment
    Skip,
    /// The subdirectory could not be listed
    Unreadable(String),
    /// Requests in listing order; images allocated zero are left out
    Augment(Vec<AugmentRequest>),
}

/// Plan for a single class subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPlan {
    pub name: String,
    pub path: PathBuf,
    pub current_count: usize,
    pub deficit: usize,
    pub action: ClassAction,
}

impl ClassPlan {
    pub fn requests(&self) -> &[AugmentRequest] {
        match &self.action {
            ClassAction::Augment(requests) => requests,
            _ => &[],
        }
    }
}

/// A complete rebalance plan for a dataset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalancePlan {
    pub target: usize,
    pub classes: Vec<ClassPlan>,
}

impl RebalancePlan {
    /// Total augmentations requested across every class
    pub fn requested_augmentations(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| c.requests())
            .map(|r| r.count)
            .sum()
    }

    /// Number of augmentation calls the plan will make
    pub fn request_count(&self) -> usize {
        self.classes.iter().map(|c| c.requests().len()).sum()
    }
}

/// A request the augmenter failed on
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub request: AugmentRequest,
    pub error: String,
}

/// Result of executing a plan
#[derive(Debug, Clone, Default)]
pub struct RebalanceOutcome {
    pub succeeded: usize,
    pub failed: Vec<FailedRequest>,
    /// Classes left short of the target because they had no images
    pub skipped: Vec<String>,
    /// Classes whose subdirectory could not be listed
    pub unreadable: Vec<String>,
    /// New files created; existing files are never counted
    pub images_written: usize,
}

impl RebalanceOutcome {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Counts before and after a full balance run
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub before: CountTable,
    pub target: usize,
    pub outcome: RebalanceOutcome,
    pub after: CountTable,
}

/// Split `deficit` across `image_count` images.
///
/// Every image gets `deficit / image_count`; the first `deficit % image_count`
/// get one more. Returns an empty vector when there are no images.
///
/// # Examples
///
/// ```
/// use leaf_dataset_tools::allocate;
///
/// assert_eq!(allocate(6, 4), vec![2, 2, 1, 1]);
/// assert_eq!(allocate(3, 7), vec![1, 1, 1, 0, 0, 0, 0]);
/// ```
pub fn allocate(deficit: usize, image_count: usize) -> Vec<usize> {
    if image_count == 0 {
        return Vec::new();
    }
    let base = deficit / image_count;
    let remainder = deficit % image_count;
    (0..image_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Plan one class against `target`
pub fn plan_class(class: &ClassDir, target: usize) -> ClassPlan {
    let current_count = class.image_count();
    let needed = deficit(current_count, target);

    let action = if let Some(reason) = &class.read_error {
        ClassAction::Unreadable(reason.clone())
    } else if needed == 0 {
        ClassAction::AlreadyBalanced
    } else if class.images.is_empty() {
        ClassAction::Skip
    } else {
        let requests = class
            .images
            .iter()
            .zip(allocate(needed, class.images.len()))
            .filter(|(_, count)| *count > 0)
            .map(|(image_path, count)| AugmentRequest {
                image_path: image_path.clone(),
                count,
            })
            .collect();
        ClassAction::Augment(requests)
    };

    ClassPlan {
        name: class.name.clone(),
        path: class.path.clone(),
        current_count,
        deficit: needed,
        action,
    }
}

/// Plan every scanned class; the target comes from the readable ones.
///
/// Returns `None` when there are no classes.
pub fn plan_classes(classes: &[ClassDir]) -> Option<RebalancePlan> {
    if classes.is_empty() {
        return None;
    }
    let target = target_count(&count_table(classes)).unwrap_or(0);

    let plan = RebalancePlan {
        target,
        classes: classes.iter().map(|c| plan_class(c, target)).collect(),
    };
    info!(
        "Planned {} augmentations in {} requests (target {})",
        plan.requested_augmentations(),
        plan.request_count(),
        target
    );
    Some(plan)
}

/// Scan `root` once and plan every class.
///
/// Returns `Ok(None)` when the root has no subdirectories.
pub fn plan_rebalance(root: &Path) -> Result<Option<RebalancePlan>, DatasetError> {
    Ok(plan_classes(&scan_class_dirs(root)?))
}

fn emit<W: Write>(out: &mut W, line: impl Display) -> Result<(), DatasetError> {
    writeln!(out, "{}", line).map_err(DatasetError::Report)
}

/// Run every request of `plan` through `augmenter`, one at a time.
///
/// Progress goes to `out`. A failed request is logged and recorded in the
/// outcome; processing carries on with the next image and class.
pub fn execute_plan<A, W>(
    plan: &RebalancePlan,
    augmenter: &mut A,
    out: &mut W,
) -> Result<RebalanceOutcome, DatasetError>
where
    A: Augment + ?Sized,
    W: Write,
{
    let mut outcome = RebalanceOutcome::default();

    for class in &plan.classes {
        let path = class.path.display();
        match &class.action {
            ClassAction::AlreadyBalanced => {
                emit(
                    out,
                    format_args!("\n{}: already balanced ({} images)", path, class.current_count),
                )?;
            }
            ClassAction::Unreadable(reason) => {
                emit(out, format_args!("\n{}: cannot be read ({}), skipping...", path, reason))?;
                warn!("Skipping unreadable class {:?}: {}", class.path, reason);
                outcome.unreadable.push(class.name.clone());
            }
            ClassAction::Skip => {
                emit(out, format_args!("\n{}: need {} more images", path, class.deficit))?;
                emit(out, format_args!("  No images to augment in {}, skipping...", path))?;
                warn!(
                    "Cannot augment {:?}: no source images ({} needed)",
                    class.path, class.deficit
                );
                outcome.skipped.push(class.name.clone());
            }
            ClassAction::Augment(requests) => {
                emit(out, format_args!("\n{}: need {} more images", path, class.deficit))?;
                for request in requests {
                    match augmenter.augment(&request.image_path, request.count) {
                        Ok(written) => {
                            outcome.succeeded += 1;
                            outcome.images_written += written.len();
                        }
                        Err(e) => {
                            let details = error_chain(&e);
                            error!(
                                "Error augmenting {:?} ({} requested): {}",
                                request.image_path, request.count, details
                            );
                            emit(
                                out,
                                format_args!(
                                    "  Error augmenting {}: {}",
                                    request.image_path.display(),
                                    details
                                ),
                            )?;
                            outcome.failed.push(FailedRequest {
                                request: request.clone(),
                                error: details,
                            });
                        }
                    }
                }
            }
        }
    }

    info!(
        "Rebalance finished: {} requests succeeded, {} failed, {} classes skipped, {} unreadable, {} images written",
        outcome.succeeded,
        outcome.failed.len(),
        outcome.skipped.len(),
        outcome.unreadable.len(),
        outcome.images_written
    );
    Ok(outcome)
}

/// The full workflow: scan, report, plan, augment, re-scan and report.
///
/// Returns `Ok(None)` after printing "No subdirectories found." when the root
/// has no class subdirectories. The root must already have been validated;
/// only a failure to read the root itself is returned as an error.
#[instrument(name = "balance_dataset", skip(augmenter, out))]
pub fn balance_dataset<A, W>(
    root: &Path,
    augmenter: &mut A,
    out: &mut W,
) -> Result<Option<BalanceReport>, DatasetError>
where
    A: Augment + ?Sized,
    W: Write,
{
    let classes = scan_class_dirs(root)?;
    let before = count_table(&classes);
    for line in format_counts(&before) {
        emit(out, line)?;
    }

    let Some(plan) = plan_classes(&classes) else {
        emit(out, "No subdirectories found.")?;
        return Ok(None);
    };
    emit(
        out,
        format_args!("\nTarget count: {} images per subdirectory", plan.target),
    )?;

    let outcome = execute_plan(&plan, augmenter, out)?;

    emit(
        out,
        format_args!(
            "\n{} augmentation requests: {} succeeded, {} failed; {} new images written; {} subdirectories skipped, {} unreadable",
            outcome.attempted(),
            outcome.succeeded,
            outcome.failed.len(),
            outcome.images_written,
            outcome.skipped.len(),
            outcome.unreadable.len()
        ),
    )?;

    let after = count_table(&scan_class_dirs(root)?);
    emit(out, "\n=== Final counts ===")?;
    for line in format_counts(&after) {
        emit(out, line)?;
    }

    Ok(Some(BalanceReport {
        before,
        target: plan.target,
        outcome,
        after,
    }))
}
