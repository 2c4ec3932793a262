//! Desired vs. actual comparison
//!
//! Config is merged, not replaced: keys that only exist remotely are kept.

use crate::client::NetworkHandle;
use crate::config::CanonicalConfig;
use crate::outcome::{Change, ChangeSet, DESCRIPTION_SLOT};

/// Compare the desired description and config with a fetched network
///
/// Every difference is recorded in the returned [`ChangeSet`] and written to
/// `working`, which is then ready to be saved. The description change comes
/// first, config keys follow in desired order.
pub fn diff<H>(description: Option<&str>, config: &CanonicalConfig, working: &mut H) -> ChangeSet
where
    H: NetworkHandle + ?Sized,
{
    let mut changes = ChangeSet::new();

    let description = description.unwrap_or_default();
    if working.description() != description {
        changes.insert(
            DESCRIPTION_SLOT,
            Change::Description {
                old: working.description().to_string(),
                new: description.to_string(),
            },
        );
        working.set_description(description);
    }

    for (key, value) in config {
        let change = match working.config_value(key) {
            Some(current) if current == value => continue,
            Some(current) => Change::ConfigUpdated {
                key: key.clone(),
                old: current.to_string(),
                new: value.clone(),
            },
            None => Change::ConfigAdded {
                key: key.clone(),
                value: value.clone(),
            },
        };
        working.set_config(key, value);
        changes.insert(key.clone(), change);
    }

    tracing::debug!(
        "Diffed network {}: {} change(s)",
        working.name(),
        changes.len()
    );
    changes
}
