use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 설정 파일에 선언된 DHCP 스코프
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scope {
    /// 서버가 부여한 스코프 ID (예: 10.0.0.0)
    #[serde(default)]
    pub id: Option<String>,

    /// 옵션 3(기본 게이트웨이)으로 설정할 주소
    #[serde(default)]
    pub gateway: Option<String>,

    /// 이 스코프 안에 만들 예약 (스코프 ID를 물려받음)
    #[serde(default)]
    pub reservations: Option<Vec<Reservation>>,
}

impl Scope {
    pub fn new(id: &str, gateway: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            gateway: Some(gateway.to_string()),
            reservations: None,
        }
    }

    /// 로그에 표시할 이름
    pub fn label(&self) -> String {
        non_empty(&self.id).unwrap_or("<no id>").to_string()
    }

    /// 중첩된 예약에 스코프 ID를 채워서 반환
    pub fn nested_reservations(&self) -> Vec<Reservation> {
        let Some(reservations) = &self.reservations else {
            return Vec::new();
        };

        reservations
            .iter()
            .map(|r| {
                let mut r = r.clone();
                if non_empty(&r.scope_id).is_none() {
                    r.scope_id = self.id.clone();
                }
                r
            })
            .collect()
    }
}

/// 클라이언트별 예약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    #[serde(default)]
    pub scope_id: Option<String>,

    /// 클라이언트 MAC 주소
    #[serde(default, alias = "MacAddress")]
    pub client_id: Option<String>,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub gateway: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Reservation {
    /// 게이트웨이만 덮어쓰는 예약
    pub fn gateway_override(ip_address: &str, gateway: &str) -> Self {
        Self {
            ip_address: Some(ip_address.to_string()),
            gateway: Some(gateway.to_string()),
            ..Default::default()
        }
    }

    pub fn label(&self) -> String {
        non_empty(&self.ip_address)
            .or_else(|| non_empty(&self.client_id))
            .or_else(|| non_empty(&self.name))
            .unwrap_or("<no address>")
            .to_string()
    }
}

/// `DhcpSettings` 섹션
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DhcpSettings {
    #[serde(default)]
    pub scopes: Option<Vec<Scope>>,

    #[serde(default)]
    pub reservations: Option<Vec<Reservation>>,
}

#[derive(Debug, Deserialize)]
struct SettingsDocument {
    #[serde(rename = "DhcpSettings", default)]
    dhcp_settings: Option<DhcpSettings>,
}

impl DhcpSettings {
    /// JSON 문자열에서 `DhcpSettings` 섹션을 읽음
    ///
    /// 섹션이 없으면 빈 설정을 반환합니다 (할 일 없음).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SettingsDocument = serde_json::from_str(json)?;
        Ok(document.dhcp_settings.unwrap_or_default())
    }

    /// 설정 파일 로드
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GatewayError::ConfigError(format!(
                "settings file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// 공백만 있는 값은 비어 있는 것으로 취급
///
/// 값 자체는 다듬지 않고 선언된 그대로 돌려줍니다.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
