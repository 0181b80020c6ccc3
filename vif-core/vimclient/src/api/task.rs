//! 任务 API
//!
//! 异步任务状态跟踪：轮询 `Task.info` 直到进入终态。

use std::time::Duration;

use tracing::{debug, info};

use crate::client::VimClient;
use crate::error::{Result, VimError};
use crate::models::{ManagedObjectReference, TaskInfo, TaskInfoState};

/// 任务 API
pub struct TaskApi<'a> {
    client: &'a VimClient,
}

impl<'a> TaskApi<'a> {
    /// 创建新的任务 API 实例
    pub(crate) fn new(client: &'a VimClient) -> Self {
        Self { client }
    }

    /// 获取任务信息
    pub async fn info(&self, task: &ManagedObjectReference) -> Result<TaskInfo> {
        self.client.property(task, "info").await
    }

    /// 等待任务完成
    ///
    /// 任务失败时返回 `VimError::Fault`，携带故障类型和本地化消息。
    pub async fn wait(&self, task: &ManagedObjectReference) -> Result<TaskInfo> {
        info!("等待任务完成: {}", task);
        let interval = Duration::from_millis(self.client.config().task_poll_interval_ms);

        loop {
            let info = self.info(task).await?;
            debug!(
                "任务 {} ({}) 状态: {:?} 进度: {:?}",
                task,
                info.description_id.as_deref().unwrap_or("-"),
                info.state,
                info.progress
            );

            if info.state.is_terminal() {
                return task_outcome(info);
            }

            tokio::time::sleep(interval).await;
        }
    }
}

/// 将终态任务信息转换为结果
pub fn task_outcome(info: TaskInfo) -> Result<TaskInfo> {
    match info.state {
        TaskInfoState::Error => {
            let (fault_type, message) = match &info.error {
                Some(error) => (error.fault_type().to_string(), error.message()),
                None => ("MethodFault".to_string(), "任务失败，未返回故障信息".to_string()),
            };
            Err(VimError::Fault { fault_type, message })
        }
        _ => Ok(info),
    }
}
