use crate::error::{GatewayError, Result};
use crate::operation::Operation;
use colored::*;
use dialoguer::Input;

/// 대화형 메뉴
pub struct MenuPrompt;

impl MenuPrompt {
    pub fn new() -> Self {
        Self
    }

    /// 작업 번호 입력 받기
    ///
    /// 입력값은 그대로 돌려주고, 해석은 `OperationSelector`가 합니다.
    pub fn choose_operation(&self) -> Result<String> {
        eprintln!("\n{}", "Select an operation:".cyan().bold());
        for operation in Operation::ALL {
            eprintln!("  {}", operation);
        }

        Input::<String>::new()
            .with_prompt("Option")
            .allow_empty(true)
            .interact_text()
            .map_err(|_| GatewayError::UserCancelled)
    }

    /// 종료 전 사용자 확인 대기
    pub fn wait_for_exit(&self) -> Result<()> {
        Input::<String>::new()
            .with_prompt("Press Enter to exit")
            .allow_empty(true)
            .report(false)
            .interact_text()
            .map_err(|_| GatewayError::UserCancelled)?;

        Ok(())
    }
}

impl Default for MenuPrompt {
    fn default() -> Self {
        Self::new()
    }
}
