//! 容器视图 API
//!
//! 在根文件夹上创建递归容器视图，得到某一类型托管对象的扁平快照。

use tracing::{debug, info, warn};

use crate::client::VimClient;
use crate::error::Result;
use crate::models::ManagedObjectReference;

/// 容器视图 API
pub struct ViewApi<'a> {
    client: &'a VimClient,
}

impl<'a> ViewApi<'a> {
    /// 创建新的视图 API 实例
    pub(crate) fn new(client: &'a VimClient) -> Self {
        Self { client }
    }

    /// 列出根文件夹下某一类型的全部托管对象
    pub async fn list(&self, kind: &str) -> Result<Vec<ManagedObjectReference>> {
        let content = self.client.content()?;

        let view: ManagedObjectReference = self.client.invoke(
            &content.view_manager,
            "CreateContainerView",
            Some(serde_json::json!({
                "container": content.root_folder,
                "type": [kind],
                "recursive": true,
            })),
        ).await?;

        let members = self.client.property_list(&view, "view").await;

        if let Err(e) = self.client.invoke::<(), ()>(&view, "DestroyView", None).await {
            warn!("销毁容器视图失败 {}: {}", view, e);
        }

        members
    }

    /// 按名称查找托管对象，返回第一个匹配项
    pub async fn find_by_name(&self, kind: &str, name: &str) -> Result<Option<ManagedObjectReference>> {
        info!("查找 {}: {}", kind, name);

        for moref in self.list(kind).await? {
            let object_name: String = self.client.property(&moref, "name").await?;
            if object_name == name {
                debug!("找到 {} -> {}", name, moref);
                return Ok(Some(moref));
            }
        }

        Ok(None)
    }
}
