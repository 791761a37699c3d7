//! Apply `custom.kubevirt.io/` annotation overrides to libvirt domain XML.
//!
//! The [domain] module holds the dotted-path merge itself, [hook] the KubeVirt
//! specific glue around it.

pub mod commands;
pub mod domain;
pub mod hook;
pub mod project;
pub mod util;
