#![allow(clippy::unwrap_used)]
// Integration tests for `ReadyNasClient` using wiremock.

use std::time::{Duration, Instant};

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use readynas_api::{ClientConfig, Error, FanMode, ReadyNasClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ReadyNasClient) {
    let server = MockServer::start().await;
    let secret: SecretString = "test-password".to_string().into();
    let config = ClientConfig::new(server.address().to_string(), "admin", secret);
    let client = ReadyNasClient::new(config).unwrap();
    (server, client)
}

fn admin_page(token: &str) -> String {
    format!(
        r#"<html><head><script type="text/javascript">
            csrfInsert("csrfpId", "{token}");
        </script></head><body></body></html>"#
    )
}

async fn mount_admin_page(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admin_page(token)))
        .mount(server)
        .await;
}

const HEALTH_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:nml xmlns:xs="http://www.netgear.com/protocol/transaction/NMLSchema-0.9" xmlns="urn:netgear:nas:readynasd">
  <xs:transaction id="njl_id_2912">
    <Health_Collection>
      <Enclosure_Health>
        <Temperature><temp_value>58</temp_value></Temperature>
        <Fan><fan_speed>1053</fan_speed></Fan>
        <Disk><disk_model>WDC WD40EFRX</disk_model><disk_temperature>34</disk_temperature><disk_status>ONLINE</disk_status><disk_capacity>4000787030016</disk_capacity></Disk>
      </Enclosure_Health>
    </Health_Collection>
  </xs:transaction>
</xs:nml>"#;

const SYSINFO_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:nml xmlns:xs="http://www.netgear.com/protocol/transaction/NMLSchema-0.9" xmlns="urn:netgear:nas:readynasd">
  <SystemInfo>
    <Model>RN31400</Model>
    <Firmware_Name>ReadyNASOS</Firmware_Name>
    <Firmware_Version>6.10.10</Firmware_Version>
    <Serial_Number>3PQ1234X00ABC</Serial_Number>
    <Uptime>1123200</Uptime>
    <MAC_Address>28:C6:8E:30:AA:01</MAC_Address>
  </SystemInfo>
</xs:nml>"#;

const FAN_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:nml xmlns:xs="http://www.netgear.com/protocol/transaction/NMLSchema-0.9" xmlns="urn:netgear:nas:readynasd">
  <Fan_Collection><FanConfig mode="quiet"/></Fan_Collection>
</xs:nml>"#;

// ── Token acquisition ───────────────────────────────────────────────

#[tokio::test]
async fn test_first_read_acquires_token() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-abc123").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(header("csrfpId", "tok-abc123"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEALTH_BODY))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.csrf_token(), None);
    let health = client.get_health().await.unwrap();

    assert_eq!(health.cpu_temp, Some(58));
    assert_eq!(health.fan_speed, Some(1053));
    assert_eq!(health.disks.len(), 1);
    assert_eq!(client.csrf_token().as_deref(), Some("tok-abc123"));
}

#[tokio::test]
async fn test_admin_page_without_token_fails_read() {
    let (server, client) = setup().await;

    // One admin GET per attempt, three attempts total.
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no script here</html>"))
        .expect(3)
        .mount(&server)
        .await;

    let result = client.get_health().await;

    match result {
        Err(Error::RetryExhausted {
            operation,
            attempts,
            source,
        }) => {
            assert_eq!(operation, "health");
            assert_eq!(attempts, 3);
            assert!(matches!(source.as_deref(), Some(Error::CsrfTokenMissing)));
        }
        other => panic!("expected RetryExhausted, got: {other:?}"),
    }
    assert_eq!(client.csrf_token(), None);
}

#[tokio::test]
async fn test_bad_credentials_surface_as_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;

    let result = client.get_health().await;

    match result {
        Err(Error::RetryExhausted { source, .. }) => {
            assert!(
                matches!(source.as_deref(), Some(Error::Authentication { .. })),
                "expected Authentication source, got: {source:?}"
            );
        }
        other => panic!("expected RetryExhausted, got: {other:?}"),
    }
}

// ── Retry loop ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_body_retries_three_times_with_backoff() {
    let (server, client) = setup().await;

    // Token survives empty responses, so the admin page is hit once.
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admin_page("tok-1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
        .expect(3)
        .mount(&server)
        .await;

    let start = Instant::now();
    let result = client.get_volumes().await;
    let elapsed = start.elapsed();

    match result {
        Err(Error::RetryExhausted {
            operation, source, ..
        }) => {
            assert_eq!(operation, "volumes");
            assert!(matches!(source.as_deref(), Some(Error::EmptyResponse)));
        }
        other => panic!("expected RetryExhausted, got: {other:?}"),
    }
    assert!(
        elapsed >= Duration::from_secs(2),
        "expected a pause between attempts, finished in {elapsed:?}"
    );
}

#[tokio::test]
async fn test_session_expiry_recovers_with_fresh_token() {
    let (server, client) = setup().await;

    // First token fetch hands out tok-old, the refresh hands out tok-new.
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admin_page("tok-old")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_admin_page(&server, "tok-new").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(header("csrfpId", "tok-old"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(header("csrfpId", "tok-new"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEALTH_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let health = client.get_health().await.unwrap();

    assert_eq!(health.cpu_temp, Some(58));
    assert_eq!(client.csrf_token().as_deref(), Some("tok-new"));
}

#[tokio::test]
async fn test_malformed_xml_consumes_retries() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<nml><broken"))
        .expect(3)
        .mount(&server)
        .await;

    let result = client.get_system_info().await;

    match result {
        Err(Error::RetryExhausted { source, .. }) => {
            assert!(matches!(source.as_deref(), Some(Error::Xml { .. })));
        }
        other => panic!("expected RetryExhausted, got: {other:?}"),
    }
}

// ── Fan mode ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_fan_mode() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains("Fan_Collection"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FAN_BODY))
        .mount(&server)
        .await;

    assert_eq!(client.get_fan_mode().await.unwrap(), FanMode::Quiet);
}

#[tokio::test]
async fn test_set_fan_mode_single_post() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains(r#"<FanConfig mode="quiet"/>"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_fan_mode(FanMode::Quiet).await.unwrap();
}

#[tokio::test]
async fn test_set_fan_mode_rejects_invalid_without_network() {
    let (server, client) = setup().await;

    // No mocks mounted: any request would 404 and, worse, be recorded.
    let result = client.set_fan_mode(FanMode::Unknown).await;
    assert!(matches!(result, Err(Error::InvalidFanMode { .. })));

    assert!("loud".parse::<FanMode>().is_err());
    assert_eq!("quiet".parse::<FanMode>().unwrap(), FanMode::Quiet);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_fan_mode_non_200_is_rejected() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.set_fan_mode(FanMode::Cool).await;
    assert!(matches!(result, Err(Error::Rejected { status: 500 })));
}

// ── Shutdown ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shutdown_success() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains(r#"name="Halt""#))
        .and(body_string_contains(r#"halt="true" fsck="false""#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_401_refreshes_token_once_but_fails() {
    let (server, client) = setup().await;

    // Initial fetch + exactly one refresh after the 401.
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admin_page("tok-1")))
        .expect(2)
        .mount(&server)
        .await;

    // The shutdown itself is never re-issued.
    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.shutdown().await;

    assert!(matches!(result, Err(Error::SessionExpired)));
    // Refresh succeeded, so the next call starts with a token in hand.
    assert_eq!(client.csrf_token().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_shutdown_non_200_is_rejected() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.shutdown().await;
    assert!(matches!(result, Err(Error::Rejected { status: 503 })));
}

// ── Aggregate report ────────────────────────────────────────────────

#[tokio::test]
async fn test_health_report_tolerates_partial_failure() {
    let (server, client) = setup().await;
    mount_admin_page(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains("Health_Collection"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEALTH_BODY))
        .mount(&server)
        .await;

    // Volume reads stay forbidden: that section must simply be absent.
    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains("Volume_Collection"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/dbbroker"))
        .and(body_string_contains("SystemInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SYSINFO_BODY))
        .mount(&server)
        .await;

    let report = client.get_health_report().await;

    assert_eq!(report.cpu_temp, Some(58));
    assert!(report.volumes.is_none());
    assert_eq!(report.os_data.as_ref().unwrap().model, "RN31400");
    assert!(!report.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("volumes"), "failed section must be omitted");
    assert!(obj.contains_key("os_data"));
}

#[tokio::test]
async fn test_health_report_empty_when_device_unreachable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let report = client.get_health_report().await;
    assert!(report.is_empty());
}
