// Request envelope builder for the dbbroker transaction protocol.
//
// Every RPC is one `<xs:transaction>` wrapping a single get/set/custom
// operation, addressed by resource-id + resource-type. The `src` and
// transaction identifiers are constants captured from the stock web
// UI's traffic; readynasd accepts them unchanged across sessions.

use crate::models::FanMode;

const NML_NS: &str = "http://www.netgear.com/protocol/transaction/NMLSchema-0.9";
const DEVICE_NS: &str = "urn:netgear:nas:readynasd";
const SRC: &str = "dpv_1739644512000";
const DST: &str = "nas";

/// A readable resource on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resource {
    Health,
    Volumes,
    SystemInfo,
    FanMode,
}

impl Resource {
    /// Short operation name, used in logs and retry-exhaustion errors.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Volumes => "volumes",
            Self::SystemInfo => "system info",
            Self::FanMode => "fan mode",
        }
    }

    fn resource_id(self) -> &'static str {
        match self {
            Self::Health => "HealthInfo",
            Self::Volumes => "Volumes",
            Self::SystemInfo => "SystemInfo",
            Self::FanMode => "FanConfig",
        }
    }

    fn resource_type(self) -> &'static str {
        match self {
            Self::Health => "Health_Collection",
            Self::Volumes => "Volume_Collection",
            Self::SystemInfo => "SystemInfo",
            Self::FanMode => "Fan_Collection",
        }
    }

    /// `(transaction id, operation id)` pair for this resource.
    fn transaction_ids(self) -> (&'static str, &'static str) {
        match self {
            Self::Health => ("njl_id_2912", "njl_id_2911"),
            Self::Volumes => ("njl_id_281", "njl_id_280"),
            Self::SystemInfo => ("njl_id_310", "njl_id_309"),
            Self::FanMode => ("njl_id_412", "njl_id_411"),
        }
    }
}

fn envelope(transaction_id: &str, operation: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><xs:nml xmlns:xs="{NML_NS}" xmlns="{DEVICE_NS}" src="{SRC}" dst="{DST}"><xs:transaction id="{transaction_id}">{operation}</xs:transaction></xs:nml>"#
    )
}

/// Read request for one of the fixed resources.
pub(crate) fn get_request(resource: Resource) -> String {
    let (transaction_id, op_id) = resource.transaction_ids();
    envelope(
        transaction_id,
        &format!(
            r#"<xs:get id="{op_id}" resource-id="{}" resource-type="{}"/>"#,
            resource.resource_id(),
            resource.resource_type(),
        ),
    )
}

/// Fan profile change. The caller must have validated the mode.
pub(crate) fn set_fan_mode_request(mode: FanMode) -> String {
    envelope(
        "njl_id_414",
        &format!(
            r#"<xs:set id="njl_id_413" resource-id="FanConfig" resource-type="Fan_Collection"><FanConfig mode="{}"/></xs:set>"#,
            mode.as_str(),
        ),
    )
}

/// Orderly halt. `fsck="false"` skips the filesystem check on next boot.
pub(crate) fn shutdown_request() -> String {
    envelope(
        "njl_id_1628",
        r#"<xs:custom id="njl_id_1628" name="Halt" resource-id="Shutdown" resource-type="System"><Shutdown halt="true" fsck="false"/></xs:custom>"#,
    )
}
