use crate::error::{GatewayError, Result};
use crate::executor::ReservationProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// dhcpgw 도구 설정
///
/// 설정 파일은 ~/.dhcpgw/config.toml에 저장됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// DhcpSettings JSON 파일 경로
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// PowerShell 실행 파일
    #[serde(default = "default_powershell_path")]
    pub powershell_path: String,

    /// 최상위 Reservations 처리 방식
    #[serde(default)]
    pub reservation_profile: ReservationProfile,

    /// 이미 있는 예약은 추가하지 않음
    #[serde(default = "default_skip_existing")]
    pub skip_existing_reservations: bool,

    /// 서버 응답 제한 시간 (초, 0이면 무제한)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_settings_path() -> String {
    "appsettings.json".to_string()
}

fn default_powershell_path() -> String {
    "powershell.exe".to_string()
}

fn default_skip_existing() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            powershell_path: default_powershell_path(),
            reservation_profile: ReservationProfile::default(),
            skip_existing_reservations: default_skip_existing(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// 설정 디렉토리 경로
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dhcpgw")
    }

    /// 설정 파일 경로 가져오기
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// 설정 파일에서 로드 (없으면 기본값 사용)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| GatewayError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// 설정을 파일에 저장
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| GatewayError::ConfigError(e.to_string()))?;

        fs::write(path, toml_string)?;

        Ok(())
    }

    /// 설정 파일 초기화 (기본값으로)
    pub fn init() -> Result<PathBuf> {
        let path = Self::config_path();
        Self::default().save_to(&path)?;
        Ok(path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
