//! Variant expansion configuration for descriptor parsing.
//!
//! Each parsed state descriptor may be expanded into several states, one per
//! variant label, named `<base><separator><label>`. The label list is a
//! caller-supplied configuration value, never compiled into the parser; with
//! no labels the expansion is a no-op.

/// Configuration controlling how one state descriptor expands into states.
///
/// # Examples
///
/// ```
/// use dmikit_types::file::dmi::VariantConfig;
///
/// // No labels: expansion is a no-op
/// let config = VariantConfig::none();
/// assert_eq!(config.expand("walk"), vec!["walk".to_string()]);
///
/// // Two labels: each descriptor yields two states
/// let config = VariantConfig::new(vec!["red".into(), "blue".into()], "-");
/// assert_eq!(config.expand("walk"), vec!["walk-red".to_string(), "walk-blue".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantConfig {
	/// Ordered variant labels; empty means no expansion
	pub labels: Vec<String>,
	/// Separator placed between the base name and a label
	pub separator: String,
}

impl VariantConfig {
	/// Creates a config with the given ordered labels and separator.
	pub fn new(labels: Vec<String>, separator: impl Into<String>) -> Self {
		Self {
			labels,
			separator: separator.into(),
		}
	}

	/// Creates a no-op config: every descriptor yields exactly one state.
	pub fn none() -> Self {
		Self::default()
	}

	/// Number of states one descriptor expands into.
	pub fn count(&self) -> usize {
		self.labels.len().max(1)
	}

	/// Expanded state names for a base name, in label order.
	pub fn expand(&self, base: &str) -> Vec<String> {
		if self.labels.is_empty() {
			return vec![base.to_string()];
		}
		self.labels
			.iter()
			.map(|label| format!("{}{}{}", base, self.separator, label))
			.collect()
	}
}
