use tracing::info;

use crate::core::dataset::CountTable;

/// The balancing target: the largest class count, or `None` when there are no classes
pub fn target_count(counts: &CountTable) -> Option<usize> {
    counts.values().copied().max()
}

/// Images a class needs to reach `target`. Never negative: classes above
/// the target are left alone.
pub fn deficit(current: usize, target: usize) -> usize {
    target.saturating_sub(current)
}

/// Share of the dataset held by one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassShare {
    pub name: String,
    pub count: usize,
    pub percentage: f32,
}

/// Statistics about how images are spread over classes
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionStats {
    pub total_images: usize,
    pub classes: Vec<ClassShare>,
    pub min_count: usize,
    pub max_count: usize,
}

impl DistributionStats {
    pub fn from_counts(counts: &CountTable) -> Self {
        let total_images: usize = counts.values().sum();
        let classes = counts
            .iter()
            .map(|(name, &count)| ClassShare {
                name: name.clone(),
                count,
                percentage: if total_images == 0 {
                    0.0
                } else {
                    (count as f32 / total_images as f32) * 100.0
                },
            })
            .collect();

        let stats = Self {
            total_images,
            classes,
            min_count: counts.values().copied().min().unwrap_or(0),
            max_count: counts.values().copied().max().unwrap_or(0),
        };

        info!(
            "Distribution: {} images over {} classes (min {}, max {})",
            stats.total_images,
            stats.classes.len(),
            stats.min_count,
            stats.max_count
        );
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Largest class over smallest class; `None` when the smallest is empty
    pub fn imbalance_ratio(&self) -> Option<f32> {
        if self.min_count == 0 {
            None
        } else {
            Some(self.max_count as f32 / self.min_count as f32)
        }
    }

    /// Whether every class already holds the same number of images
    pub fn is_balanced(&self) -> bool {
        self.min_count == self.max_count
    }
}

/// `name: N images` per class, in table order
pub fn format_counts(counts: &CountTable) -> Vec<String> {
    counts
        .iter()
        .map(|(name, count)| format!("{}: {} images", name, count))
        .collect()
}

/// Text rendering of a distribution, one line per class with a bar scaled
/// to the largest class, followed by a totals line
pub fn format_distribution(stats: &DistributionStats, bar_width: usize) -> Vec<String> {
    let name_width = stats
        .classes
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = stats
        .classes
        .iter()
        .map(|class| {
            let bar_len = if stats.max_count == 0 {
                0
            } else {
                (class.count * bar_width + stats.max_count / 2) / stats.max_count
            };
            format!(
                "{:<width$}  {:>6} images ({:>5.1}%)  {}",
                class.name,
                class.count,
                class.percentage,
                "#".repeat(bar_len),
                width = name_width
            )
        })
        .collect();

    let ratio = match stats.imbalance_ratio() {
        Some(ratio) => format!("{:.1}:1", ratio),
        None => "n/a".to_string(),
    };
    lines.push(format!(
        "Total: {} images in {} classes, imbalance ratio {}",
        stats.total_images,
        stats.classes.len(),
        ratio
    ));
    lines
}
