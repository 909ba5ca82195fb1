use serde_json::Value;
use std::borrow::Cow;
use std::iter;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use super::lookup::{entries, get_by_key, get_by_path, get_in, get_object};

/// A single rig as reported by the remote API.
///
/// No schema is enforced: any key may be missing or hold an unexpected type,
/// and the shape differs between firmware and API versions.
pub type RigRecord = Value;

/// Values the API uses when no real name has been assigned.
pub const PLACEHOLDER_RIG_NAMES: [&str; 3] = ["__DEFAULT__", "- UNMANAGED -", "UNMANAGED"];

/// Keys that may hold a rig name, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum NameKey {
    Name,
    DisplayName,
    RigDisplayName,
    Label,
    Worker,
    RigName,
    GroupName,
}

/// Returns the most meaningful human-readable name for a rig.
///
/// Candidates are probed from the top-level record, `metadata`, `group`,
/// the v4 worker/OS/device sections and finally the top-level device list.
/// The first candidate that is a non-empty string once trimmed, and is not a
/// placeholder, wins. Otherwise the raw `rigId` is returned untouched: a
/// string as-is, any other non-null value in its JSON form.
pub fn resolve_rig_name(rig: Option<&RigRecord>) -> Option<Cow<'_, str>> {
    let rig = rig.filter(|rig| rig.as_object().is_some_and(|fields| !fields.is_empty()))?;

    candidates(rig)
        .find_map(normalize)
        .map(Cow::Borrowed)
        .or_else(|| get_by_key(rig, "rigId").and_then(raw_rig_id))
}

fn raw_rig_id(rig_id: &Value) -> Option<Cow<'_, str>> {
    match rig_id {
        Value::Null => None,
        Value::String(id) => Some(Cow::Borrowed(id.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

fn candidates(rig: &RigRecord) -> impl Iterator<Item = Option<&Value>> {
    let metadata = get_by_key(rig, "metadata");
    // only `group` is shape-checked before probing
    let group = get_object(rig, "group");
    let v4 = get_by_key(rig, "v4");

    keyed(Some(rig))
        .chain(keyed(metadata))
        .chain(keyed(group))
        .chain(iter::once(get_by_key(rig, "groupName")))
        .chain(iter::once(get_in(v4, "mmv").and_then(|mmv| get_by_key(mmv, "workerName"))))
        .chain(entries(v4, "osv").map(|os| get_by_key(os, "value")))
        .chain(entries(v4, "devices").map(|device| get_by_path(device, &["dsv", "name"])))
        .chain(entries(Some(rig), "devices").map(|device| get_by_key(device, "name")))
}

fn keyed(section: Option<&Value>) -> impl Iterator<Item = Option<&Value>> {
    NameKey::iter().map(move |key| get_in(section, <&'static str>::from(key)))
}

fn normalize(candidate: Option<&Value>) -> Option<&str> {
    let name = candidate?.as_str()?.trim();
    if name.is_empty() || is_placeholder(name) {
        return None;
    }
    Some(name)
}

fn is_placeholder(name: &str) -> bool {
    let upper = name.to_uppercase();
    PLACEHOLDER_RIG_NAMES.iter().any(|token| upper == token.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(rig: &Value) -> Option<Cow<'_, str>> {
        resolve_rig_name(Some(rig))
    }

    #[test]
    fn test_name_key_order_and_spelling() {
        let keys: Vec<&'static str> = NameKey::iter().map(Into::into).collect();
        assert_eq!(
            keys,
            ["name", "displayName", "rigDisplayName", "label", "worker", "rigName", "groupName"]
        );
    }

    #[test]
    fn test_top_level_wins_and_is_trimmed() {
        let rig = json!({"name": "  GPU-Rig-1  ", "metadata": {"name": "fallback"}});
        assert_eq!(resolve(&rig).as_deref(), Some("GPU-Rig-1"));
    }

    #[test]
    fn test_placeholder_is_skipped() {
        let rig = json!({"name": "UNMANAGED", "metadata": {"displayName": "Worker7"}});
        assert_eq!(resolve(&rig).as_deref(), Some("Worker7"));
    }

    #[test]
    fn test_placeholders_match_case_insensitively() {
        for placeholder in ["unmanaged", "- Unmanaged -", "__default__", "  UNMANAGED  "] {
            let rig = json!({"name": placeholder, "label": "real"});
            assert_eq!(resolve(&rig).as_deref(), Some("real"), "placeholder {placeholder:?}");
        }
        // not an exact sentinel
        let rig = json!({"name": "UNMANAGED-2"});
        assert_eq!(resolve(&rig).as_deref(), Some("UNMANAGED-2"));
    }

    #[test]
    fn test_whitespace_only_falls_through() {
        let rig = json!({"name": "   ", "displayName": "\t", "metadata": {"name": "   "}, "group": {"label": "G"}});
        assert_eq!(resolve(&rig).as_deref(), Some("G"));
    }

    #[test]
    fn test_non_string_candidates_are_skipped() {
        let rig = json!({"name": 42, "displayName": {"x": 1}, "label": ["a"], "worker": null, "rigName": "R"});
        assert_eq!(resolve(&rig).as_deref(), Some("R"));
    }

    #[test]
    fn test_key_order_within_location() {
        let rig = json!({"groupName": "last", "worker": "worker", "label": "label"});
        assert_eq!(resolve(&rig).as_deref(), Some("label"));
    }

    #[test]
    fn test_metadata_before_group() {
        let rig = json!({"metadata": {"groupName": "meta"}, "group": {"name": "group"}});
        assert_eq!(resolve(&rig).as_deref(), Some("meta"));
    }

    #[test]
    fn test_group_must_be_mapping() {
        let rig = json!({"group": "Farm", "v4": {"mmv": {"workerName": "worker-a"}}});
        assert_eq!(resolve(&rig).as_deref(), Some("worker-a"));
    }

    #[test]
    fn test_non_mapping_metadata_contributes_nothing() {
        let rig = json!({"metadata": ["name"], "rigId": "id-1"});
        assert_eq!(resolve(&rig).as_deref(), Some("id-1"));
    }

    #[test]
    fn test_v4_worker_name_before_os_values() {
        let rig = json!({"v4": {
            "mmv": {"workerName": " miner-01 "},
            "osv": [{"value": "os-name"}]
        }});
        assert_eq!(resolve(&rig).as_deref(), Some("miner-01"));
    }

    #[test]
    fn test_os_values_in_sequence_order() {
        let rig = json!({"v4": {"osv": [{"value": ""}, {"value": 7}, "bad", {"value": "second"}, {"value": "third"}]}});
        assert_eq!(resolve(&rig).as_deref(), Some("second"));
    }

    #[test]
    fn test_deep_device_fallback() {
        let rig = json!({"v4": {"devices": [{"dsv": {"name": "RTX3080-A"}}]}});
        assert_eq!(resolve(&rig).as_deref(), Some("RTX3080-A"));
    }

    #[test]
    fn test_v4_devices_before_top_level_devices() {
        let rig = json!({
            "v4": {"devices": [{"dsv": null}, {"dsv": {"name": "__DEFAULT__"}}, {"dsv": {"name": "v4-dev"}}]},
            "devices": [{"name": "top-dev"}]
        });
        assert_eq!(resolve(&rig).as_deref(), Some("v4-dev"));
    }

    #[test]
    fn test_top_level_devices() {
        let rig = json!({"devices": [{"id": 1}, {"name": " "}, {"name": "Antminer S19"}], "rigId": "r"});
        assert_eq!(resolve(&rig).as_deref(), Some("Antminer S19"));
    }

    #[test]
    fn test_null_sections_are_tolerated() {
        let rig = json!({"metadata": null, "group": null, "v4": null, "devices": null, "rigId": "r-9"});
        assert_eq!(resolve(&rig).as_deref(), Some("r-9"));
    }

    #[test]
    fn test_rig_id_fallback() {
        assert_eq!(resolve(&json!({"rigId": "abc123"})).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_rig_id_returned_verbatim() {
        let rig = json!({"name": "UNMANAGED", "rigId": "  UNMANAGED "});
        assert_eq!(resolve(&rig).as_deref(), Some("  UNMANAGED "));
    }

    #[test]
    fn test_no_name_and_no_rig_id() {
        assert_eq!(resolve(&json!({"name": "- UNMANAGED -"})).as_deref(), None);
    }

    #[test]
    fn test_non_string_rig_id_returned_as_json() {
        assert_eq!(resolve(&json!({"rigId": 12345})).as_deref(), Some("12345"));
        assert_eq!(resolve(&json!({"name": " ", "rigId": {"id": 7}})).as_deref(), Some(r#"{"id":7}"#));
        assert_eq!(resolve(&json!({"rigId": null})), None);
        assert!(matches!(resolve(&json!({"rigId": "abc"})), Some(Cow::Borrowed("abc"))));
    }

    #[test]
    fn test_empty_or_missing_input() {
        assert_eq!(resolve_rig_name(None), None);
        assert_eq!(resolve(&Value::Null).as_deref(), None);
        assert_eq!(resolve(&json!({})).as_deref(), None);
        assert_eq!(resolve(&json!("rig")).as_deref(), None);
        assert_eq!(resolve(&json!([{"name": "x"}])).as_deref(), None);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let rig = json!({
            "metadata": {"label": " "},
            "v4": {"osv": [{"value": "HiveOS"}]},
            "rigId": "id"
        });
        assert_eq!(resolve(&rig), resolve(&rig));
        assert_eq!(resolve(&rig).as_deref(), Some("HiveOS"));
    }
}
