use indexmap::IndexMap;
use log::warn;

use crate::domain::Override;

/// Annotations with this prefix are turned into domain overrides.
pub const ANNOTATION_PREFIX: &str = "custom.kubevirt.io/";

/// Select the annotations carrying `prefix` and turn them into overrides.
///
/// The rest of the key after the prefix is the dotted path, the annotation
/// value is the value. Annotation order is kept.
///
/// # Arguments
///
/// * `annotations`: The annotations of the VirtualMachineInstance
/// * `prefix`: The annotation prefix to select
///
/// returns: Vec<Override>
pub fn extract_overrides(annotations: &IndexMap<String, String>, prefix: &str) -> Vec<Override> {
    annotations
        .iter()
        .filter_map(|(key, value)| {
            let path = key.strip_prefix(prefix)?;
            if path.is_empty() {
                warn!("Ignoring annotation '{}' without a path", key);
                return None;
            }
            Some(Override::new(path, value.as_str()))
        })
        .collect()
}

/// Sort overrides by path so that the merge result does not depend on the
/// order annotations were delivered in. Overrides sharing a path keep their
/// relative order.
pub fn sort_overrides(overrides: &mut [Override]) {
    overrides.sort_by(|a, b| a.path.cmp(&b.path));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn annotations(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_by_prefix() {
        let annotations = annotations(&[
            ("kubevirt.io/latest-observed-api-version", "v1"),
            ("custom.kubevirt.io/devices.disk.driver", "qemu"),
            ("custom.kubevirt.io/memory", "2048"),
            ("other.io/custom.kubevirt.io/name", "ignored"),
        ]);

        assert_eq!(
            extract_overrides(&annotations, ANNOTATION_PREFIX),
            vec![
                Override::new("devices.disk.driver", "qemu"),
                Override::new("memory", "2048"),
            ]
        );
    }

    #[test]
    fn test_extract_skips_empty_path() {
        let annotations = annotations(&[("custom.kubevirt.io/", "x")]);
        assert!(extract_overrides(&annotations, ANNOTATION_PREFIX).is_empty());
    }

    #[test]
    fn test_extract_custom_prefix() {
        let annotations = annotations(&[("hooks.example.io/name", "vm")]);
        assert_eq!(
            extract_overrides(&annotations, "hooks.example.io/"),
            vec![Override::new("name", "vm")]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let mut overrides = vec![
            Override::new("name", "b"),
            Override::new("devices.disk", "x"),
            Override::new("name", "a"),
        ];
        sort_overrides(&mut overrides);
        assert_eq!(
            overrides,
            vec![
                Override::new("devices.disk", "x"),
                Override::new("name", "b"),
                Override::new("name", "a"),
            ]
        );
    }
}
