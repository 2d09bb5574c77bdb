// Response decoders
//
// Pure functions over response text, no I/O. readynasd serves elements
// under the `urn:netgear:nas:readynasd` default namespace, so matching
// is done on local names only.

use roxmltree::{Document, Node};
use tracing::trace;

use crate::error::{Error, body_preview};
use crate::models::{DiskInfo, FanMode, HealthInfo, RaidConfig, SystemInfo, VolumeInfo, unknown};

/// `Capacity` / `Free` arrive in KB; the UI shows GB.
const KB_PER_GB: f64 = 1024.0 * 1024.0;

fn parse_document(xml: &str) -> Result<Document<'_>, Error> {
    Document::parse(xml).map_err(|e| Error::Xml {
        message: format!("{e} (body preview: {:?})", body_preview(xml)),
    })
}

// ── Node helpers ─────────────────────────────────────────────────────

fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn first_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> Option<Node<'a, 'input>> {
    descendants_named(node, name).next()
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Text of a direct child element, trimmed. Empty text counts as absent.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    let text = child(node, name)?.text()?.trim();
    (!text.is_empty()).then_some(text)
}

fn child_text_or_unknown(node: Node<'_, '_>, name: &str) -> String {
    child_text(node, name).map_or_else(unknown, str::to_owned)
}

fn child_number<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Option<T> {
    child_text(node, name)?.parse().ok()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ── Health ───────────────────────────────────────────────────────────

/// Decode the `Health_Collection` response.
///
/// CPU temperature and fan speed are read per enclosure with
/// last-write-wins — multi-enclosure units report one value for the
/// head unit, which is the one the UI shows. Disks accumulate across
/// all enclosures.
pub(crate) fn parse_health(xml: &str) -> Result<HealthInfo, Error> {
    let doc = parse_document(xml)?;
    let mut info = HealthInfo::default();

    for enclosure in descendants_named(doc.root(), "Enclosure_Health") {
        if let Some(temperature) = first_descendant(enclosure, "Temperature") {
            if let Some(value) = child_number(temperature, "temp_value") {
                info.cpu_temp = Some(value);
            }
        }

        if let Some(fan) = first_descendant(enclosure, "Fan") {
            if let Some(value) = child_number(fan, "fan_speed") {
                info.fan_speed = Some(value);
            }
        }

        for disk in descendants_named(enclosure, "Disk") {
            info.disks.push(DiskInfo {
                model: child_text_or_unknown(disk, "disk_model"),
                temperature: child_number(disk, "disk_temperature"),
                status: child_text_or_unknown(disk, "disk_status"),
                capacity: child_number(disk, "disk_capacity"),
            });
        }
    }

    trace!(disks = info.disks.len(), "decoded health collection");
    Ok(info)
}

// ── Volumes ──────────────────────────────────────────────────────────

/// Decode the `Volume_Collection` response.
///
/// Volumes without a `Property_List` child are placeholders for
/// unconfigured bays and are skipped.
pub(crate) fn parse_volumes(xml: &str) -> Result<Vec<VolumeInfo>, Error> {
    let doc = parse_document(xml)?;
    let mut volumes = Vec::new();

    for volume in descendants_named(doc.root(), "Volume") {
        let Some(props) = child(volume, "Property_List") else {
            continue;
        };

        let capacity_gb = round_to(
            child_number::<f64>(props, "Capacity").unwrap_or(0.0) / KB_PER_GB,
            2,
        );
        let free_gb = round_to(
            child_number::<f64>(props, "Free").unwrap_or(0.0) / KB_PER_GB,
            2,
        );
        let used_gb = round_to(
            child_number::<f64>(props, "DataUsedKB").unwrap_or(0.0) / 1024.0,
            2,
        );
        let used_percentage = if capacity_gb > 0.0 {
            round_to(used_gb / capacity_gb * 100.0, 1)
        } else {
            0.0
        };

        let raid_configs = descendants_named(volume, "RAID")
            .map(|raid| RaidConfig {
                level: raid.attribute("LEVEL").unwrap_or("Unknown").to_owned(),
                id: raid.attribute("ID").unwrap_or("Unknown").to_owned(),
                disks: raid
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == "Disk")
                    .filter_map(|disk| disk.attribute("resource-id"))
                    .map(str::to_owned)
                    .collect(),
            })
            .collect();

        volumes.push(VolumeInfo {
            name: child_text_or_unknown(props, "Volume_Name"),
            raid_level: child_text_or_unknown(props, "RAID_Level"),
            health: child_text_or_unknown(props, "Health"),
            capacity_gb,
            free_gb,
            used_gb,
            used_percentage,
            encryption_enabled: child(props, "Encryption")
                .and_then(|n| n.attribute("enabled"))
                .unwrap_or("0")
                == "1",
            auto_expand: child_text(props, "AutoExpand").unwrap_or("off") == "on",
            quota_enabled: child_text(props, "Quota").unwrap_or("off") == "on",
            raid_configs,
        });
    }

    trace!(volumes = volumes.len(), "decoded volume collection");
    Ok(volumes)
}

// ── System info ──────────────────────────────────────────────────────

/// Decode the `SystemInfo` response. Absent fields stay `"Unknown"`;
/// when the document carries several `SystemInfo` nodes the last one
/// wins.
pub(crate) fn parse_system_info(xml: &str) -> Result<SystemInfo, Error> {
    let doc = parse_document(xml)?;
    let mut info = SystemInfo::default();

    for node in descendants_named(doc.root(), "SystemInfo") {
        info = SystemInfo {
            model: child_text_or_unknown(node, "Model"),
            firmware_name: child_text_or_unknown(node, "Firmware_Name"),
            firmware_version: child_text_or_unknown(node, "Firmware_Version"),
            serial_number: child_text_or_unknown(node, "Serial_Number"),
            uptime: child_text_or_unknown(node, "Uptime"),
            mac_address: child_text_or_unknown(node, "MAC_Address"),
        };
    }

    Ok(info)
}

// ── Fan mode ─────────────────────────────────────────────────────────

/// Decode the fan configuration response: the `mode` attribute of the
/// first `FanConfig` node, `Unknown` when absent or unrecognized.
pub(crate) fn parse_fan_mode(xml: &str) -> Result<FanMode, Error> {
    let doc = parse_document(xml)?;
    Ok(first_descendant(doc.root(), "FanConfig")
        .and_then(|node| node.attribute("mode"))
        .map_or(FanMode::Unknown, |mode| {
            mode.parse().unwrap_or(FanMode::Unknown)
        }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HEALTH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:nml xmlns:xs="http://www.netgear.com/protocol/transaction/NMLSchema-0.9" xmlns="urn:netgear:nas:readynasd" src="nas" dst="dpv_1739644512000">
  <xs:transaction id="njl_id_2912">
    <xs:response id="njl_id_2911" status="success">
      <Health_Collection>
        <Enclosure_Health resource-id="Enclosure!!0">
          <Temperature resource-id="Temperature!!0"><temp_value>58</temp_value><temp_min>0</temp_min><temp_max>95</temp_max></Temperature>
          <Fan resource-id="Fan!!0"><fan_speed>1053</fan_speed><fan_status>ok</fan_status></Fan>
          <Disk resource-id="sda">
            <disk_model>WDC WD40EFRX-68N32N0</disk_model>
            <disk_temperature>34</disk_temperature>
            <disk_status>ONLINE</disk_status>
            <disk_capacity>4000787030016</disk_capacity>
          </Disk>
          <Disk resource-id="sdb">
            <disk_status>ONLINE</disk_status>
          </Disk>
        </Enclosure_Health>
      </Health_Collection>
    </xs:response>
  </xs:transaction>
</xs:nml>"#;

    #[test]
    fn health_extracts_temps_fans_and_disks() {
        let info = parse_health(HEALTH_XML).expect("fixture should decode");
        assert_eq!(info.cpu_temp, Some(58));
        assert_eq!(info.fan_speed, Some(1053));
        assert_eq!(info.disks.len(), 2);
        assert_eq!(info.disks[0].model, "WDC WD40EFRX-68N32N0");
        assert_eq!(info.disks[0].temperature, Some(34));
        assert_eq!(info.disks[0].status, "ONLINE");
        assert_eq!(info.disks[0].capacity, Some(4_000_787_030_016));
    }

    #[test]
    fn health_disk_defaults_for_missing_fields() {
        let info = parse_health(HEALTH_XML).expect("fixture should decode");
        assert_eq!(info.disks[1].model, "Unknown");
        assert_eq!(info.disks[1].temperature, None);
        assert_eq!(info.disks[1].capacity, None);
    }

    #[test]
    fn health_last_enclosure_wins() {
        let xml = r#"<root>
            <Enclosure_Health><Temperature><temp_value>50</temp_value></Temperature></Enclosure_Health>
            <Enclosure_Health><Temperature><temp_value>61</temp_value></Temperature></Enclosure_Health>
        </root>"#;
        let info = parse_health(xml).expect("should decode");
        assert_eq!(info.cpu_temp, Some(61));
        assert_eq!(info.fan_speed, None);
    }

    #[test]
    fn health_with_no_enclosures_is_empty() {
        let info = parse_health("<root/>").expect("should decode");
        assert_eq!(info.cpu_temp, None);
        assert_eq!(info.fan_speed, None);
        assert!(info.disks.is_empty());
    }

    #[test]
    fn health_rejects_malformed_xml() {
        let err = parse_health("<root><unclosed>").expect_err("must fail");
        assert!(matches!(err, Error::Xml { .. }));
    }

    const VOLUME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:nml xmlns:xs="http://www.netgear.com/protocol/transaction/NMLSchema-0.9" xmlns="urn:netgear:nas:readynasd">
  <xs:transaction id="njl_id_281">
    <Volume_Collection>
      <Volume resource-id="Volume!!data">
        <Property_List>
          <Volume_Name>data</Volume_Name>
          <RAID_Level>X-RAID2</RAID_Level>
          <Health>Redundant</Health>
          <Capacity>2097152</Capacity>
          <Free>1048576</Free>
          <DataUsedKB>1048576000</DataUsedKB>
          <Encryption enabled="1"/>
          <AutoExpand>on</AutoExpand>
          <Quota>off</Quota>
        </Property_List>
        <RAID LEVEL="5" ID="md127">
          <Disk resource-id="sda"/>
          <Disk resource-id="sdb"/>
        </RAID>
      </Volume>
      <Volume resource-id="Volume!!spare"/>
    </Volume_Collection>
  </xs:transaction>
</xs:nml>"#;

    #[test]
    fn volume_unit_conversions() {
        let volumes = parse_volumes(VOLUME_XML).expect("fixture should decode");
        assert_eq!(volumes.len(), 1, "volume without Property_List is skipped");

        let v = &volumes[0];
        assert_eq!(v.name, "data");
        assert_eq!(v.raid_level, "X-RAID2");
        assert_eq!(v.health, "Redundant");
        assert!((v.capacity_gb - 2.0).abs() < f64::EPSILON);
        assert!((v.free_gb - 1.0).abs() < f64::EPSILON);
        assert!((v.used_gb - 1_024_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_used_percentage_invariant() {
        let volumes = parse_volumes(VOLUME_XML).expect("fixture should decode");
        let v = &volumes[0];
        let expected = round_to(v.used_gb / v.capacity_gb * 100.0, 1);
        assert!((v.used_percentage - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn volume_flags_and_raid() {
        let volumes = parse_volumes(VOLUME_XML).expect("fixture should decode");
        let v = &volumes[0];
        assert!(v.encryption_enabled);
        assert!(v.auto_expand);
        assert!(!v.quota_enabled);
        assert_eq!(v.raid_configs.len(), 1);
        assert_eq!(v.raid_configs[0].level, "5");
        assert_eq!(v.raid_configs[0].id, "md127");
        assert_eq!(v.raid_configs[0].disks, vec!["sda", "sdb"]);
    }

    #[test]
    fn volume_zero_capacity_has_zero_percentage() {
        let xml = r#"<root><Volume><Property_List>
            <Volume_Name>empty</Volume_Name>
            <Capacity>0</Capacity>
            <DataUsedKB>1024</DataUsedKB>
        </Property_List></Volume></root>"#;
        let volumes = parse_volumes(xml).expect("should decode");
        assert!((volumes[0].used_percentage - 0.0).abs() < f64::EPSILON);
        assert_eq!(volumes[0].raid_level, "Unknown");
        assert!(!volumes[0].encryption_enabled);
    }

    #[test]
    fn system_info_maps_fields() {
        let xml = r#"<root><SystemInfo>
            <Model>RN31400</Model>
            <Firmware_Name>ReadyNASOS</Firmware_Name>
            <Firmware_Version>6.10.10</Firmware_Version>
            <Serial_Number>3PQ1234X00ABC</Serial_Number>
            <Uptime>1123200</Uptime>
            <MAC_Address>28:C6:8E:30:AA:01</MAC_Address>
        </SystemInfo></root>"#;
        let info = parse_system_info(xml).expect("should decode");
        assert_eq!(info.model, "RN31400");
        assert_eq!(info.firmware_name, "ReadyNASOS");
        assert_eq!(info.firmware_version, "6.10.10");
        assert_eq!(info.serial_number, "3PQ1234X00ABC");
        assert_eq!(info.uptime, "1123200");
        assert_eq!(info.mac_address, "28:C6:8E:30:AA:01");
    }

    #[test]
    fn system_info_defaults_and_last_node_wins() {
        let info = parse_system_info("<root/>").expect("should decode");
        assert_eq!(info.model, "Unknown");
        assert_eq!(info.mac_address, "Unknown");

        let xml = r#"<root>
            <SystemInfo><Model>first</Model></SystemInfo>
            <SystemInfo><Model>second</Model></SystemInfo>
        </root>"#;
        let info = parse_system_info(xml).expect("should decode");
        assert_eq!(info.model, "second");
        assert_eq!(info.firmware_name, "Unknown");
    }

    #[test]
    fn fan_mode_reads_first_node() {
        let xml = r#"<root><Fan_Collection>
            <FanConfig mode="balanced"/>
            <FanConfig mode="cool"/>
        </Fan_Collection></root>"#;
        assert_eq!(parse_fan_mode(xml).expect("decode"), FanMode::Balanced);
    }

    #[test]
    fn fan_mode_defaults_to_unknown() {
        assert_eq!(parse_fan_mode("<root/>").expect("decode"), FanMode::Unknown);
        let xml = r#"<root><FanConfig mode="turbo"/></root>"#;
        assert_eq!(parse_fan_mode(xml).expect("decode"), FanMode::Unknown);
    }
}
