//! VIM 客户端核心实现

use std::sync::Arc;
use tokio::sync::RwLock;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::error::{VimError, Result};
use crate::api::{ViewApi, VmApi, NetworkApi, TaskApi};
use crate::models::{kind, ManagedObjectReference, MethodFault, ServiceContent, UserSession};

/// 会话令牌请求头
pub const SESSION_HEADER: &str = "vmware-api-session-id";

/// VIM 客户端配置
#[derive(Debug, Clone)]
pub struct VimConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书
    pub verify_ssl: bool,

    /// VI/JSON API 版本，如 "8.0.1.0"
    pub api_release: String,

    /// 任务轮询间隔（毫秒）
    pub task_poll_interval_ms: u64,
}

impl Default for VimConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            verify_ssl: true,
            api_release: "8.0.1.0".to_string(),
            task_poll_interval_ms: 1000,
        }
    }
}

/// VIM 客户端
pub struct VimClient {
    /// API 基础 URL (https://host:port/sdk/vim25/{release})
    base_url: String,

    /// HTTP 客户端
    http_client: Client,

    /// 会话令牌
    session_id: Arc<RwLock<Option<String>>>,

    /// 服务实例内容（connect 后可用）
    content: Option<ServiceContent>,

    /// 配置
    config: VimConfig,
}

impl VimClient {
    /// 创建新的 VIM 客户端
    ///
    /// # Arguments
    /// * `endpoint` - 服务端根地址，如 `https://vcenter.lab.local:443`
    pub fn new(endpoint: &str, config: VimConfig) -> Result<Self> {
        let endpoint = url::Url::parse(endpoint)
            .map_err(|e| VimError::ConfigError(format!("无效的服务端地址 {}: {}", endpoint, e)))?;

        if config.api_release.is_empty() {
            return Err(VimError::ConfigError("api_release 不能为空".to_string()));
        }

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| VimError::HttpError(e.to_string()))?;

        let base_url = format!(
            "{}/sdk/vim25/{}",
            endpoint.as_str().trim_end_matches('/'),
            config.api_release
        );

        Ok(Self {
            base_url,
            http_client,
            session_id: Arc::new(RwLock::new(None)),
            content: None,
            config,
        })
    }

    /// 根据主机名和端口拼接服务端根地址
    pub fn endpoint(host: &str, port: u16) -> String {
        format!("https://{}:{}", host, port)
    }

    /// 建立会话
    ///
    /// 先读取服务实例内容，再调用 SessionManager.Login。
    pub async fn connect(&mut self, username: &str, password: &str) -> Result<UserSession> {
        info!("VIM 客户端登录: {}", username);

        let content: ServiceContent = self
            .request_unauthenticated(
                Method::GET,
                &format!("/{}/{}/content", kind::SERVICE_INSTANCE, kind::SERVICE_INSTANCE),
            )
            .await?;

        if let Some(about) = &content.about {
            info!("服务端: {} (API {})", about.full_name, about.api_version);
        }

        let login_url = format!("{}/{}/Login", self.base_url, content.session_manager.path());
        let response = self
            .http_client
            .post(&login_url)
            .json(&serde_json::json!({
                "userName": username,
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match Self::parse_fault(status, &text) {
                VimError::Fault { fault_type, message } => {
                    VimError::AuthError(format!("登录失败 [{}]: {}", fault_type, message))
                }
                other => other,
            });
        }

        let token = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .ok_or_else(|| VimError::AuthError("响应中未包含会话令牌".to_string()))?;

        let session: UserSession = response
            .json()
            .await
            .map_err(|e| VimError::ParseError(e.to_string()))?;

        *self.session_id.write().await = Some(token);
        self.content = Some(content);

        info!("VIM 客户端登录成功");
        Ok(session)
    }

    /// 注销会话
    ///
    /// 未登录时直接返回；无论远端调用是否成功都会清除本地令牌。
    pub async fn logout(&mut self) -> Result<()> {
        if self.session_id.read().await.is_none() {
            return Ok(());
        }
        let session_manager = match &self.content {
            Some(content) => content.session_manager.clone(),
            None => return Ok(()),
        };

        info!("VIM 客户端登出");
        let result = self
            .invoke::<(), ()>(&session_manager, "Logout", None)
            .await;

        *self.session_id.write().await = None;
        result
    }

    /// 是否已建立会话
    pub async fn is_connected(&self) -> bool {
        self.session_id.read().await.is_some()
    }

    /// 获取服务实例内容
    pub fn content(&self) -> Result<&ServiceContent> {
        self.content
            .as_ref()
            .ok_or_else(|| VimError::AuthError("未认证，请先登录".to_string()))
    }

    /// 获取容器视图 API
    pub fn view(&self) -> ViewApi<'_> {
        ViewApi::new(self)
    }

    /// 获取虚拟机 API
    pub fn vm(&self) -> VmApi<'_> {
        VmApi::new(self)
    }

    /// 获取网络 API
    pub fn network(&self) -> NetworkApi<'_> {
        NetworkApi::new(self)
    }

    /// 获取任务 API
    pub fn task(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    /// 读取托管对象属性 (GET /{type}/{id}/{property})
    pub async fn property<R: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        property: &str,
    ) -> Result<R> {
        self.request(
            Method::GET,
            &format!("/{}/{}", moref.path(), property),
            None::<()>,
        ).await
    }

    /// 读取数组属性
    ///
    /// 未设置的数组属性在 VI/JSON 中返回空响应或 `null`，统一视为空列表。
    pub async fn property_list<R: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        property: &str,
    ) -> Result<Vec<R>> {
        let list: Option<Vec<R>> = self.property(moref, property).await?;
        Ok(list.unwrap_or_default())
    }

    /// 调用托管对象方法 (POST /{type}/{id}/{method})
    pub async fn invoke<T: Serialize, R: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        method: &str,
        body: Option<T>,
    ) -> Result<R> {
        self.request(
            Method::POST,
            &format!("/{}/{}", moref.path(), method),
            body,
        ).await
    }

    /// 发送 HTTP 请求
    pub(crate) async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!("VIM API 请求: {} {}", method, url);

        let token = self.session_id.read().await;
        let token_str = token.as_ref()
            .ok_or_else(|| VimError::AuthError("未认证，请先登录".to_string()))?;

        let mut request = self.http_client
            .request(method, &url)
            .header(SESSION_HEADER, token_str);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Self::read_response(response).await
    }

    /// 发送无需会话的请求（仅用于读取服务实例内容）
    async fn request_unauthenticated<R: DeserializeOwned>(&self, method: Method, path: &str) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!("VIM API 请求: {} {}", method, url);

        let response = self.http_client.request(method, &url).send().await?;
        Self::read_response(response).await
    }

    async fn read_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        let text = response.text().await
            .map_err(|e| VimError::ParseError(format!("无法读取响应: {}", e)))?;

        if !status.is_success() {
            warn!("API 请求失败: {} - {}", status, text);
            return Err(Self::parse_fault(status, &text));
        }

        Self::parse_body(&text)
    }

    /// 解析响应体，空响应按 `null` 处理
    pub(crate) fn parse_body<R: DeserializeOwned>(text: &str) -> Result<R> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| {
            let preview: String = text.chars().take(500).collect();
            VimError::ParseError(format!("{}，响应: {}", e, preview))
        })
    }

    /// 将失败响应转换为错误
    ///
    /// 响应体是带 `_typeName` 的 MethodFault 时返回 `Fault`。
    pub(crate) fn parse_fault(status: StatusCode, text: &str) -> VimError {
        if let Ok(fault) = serde_json::from_str::<MethodFault>(text) {
            if !fault.type_name.is_empty() {
                return VimError::Fault {
                    message: fault.message(),
                    fault_type: fault.type_name,
                };
            }
        }

        if status == StatusCode::UNAUTHORIZED {
            return VimError::AuthError(format!("会话无效或已过期: {}", text));
        }

        if status == StatusCode::NOT_FOUND {
            return VimError::NotFound(text.to_string());
        }

        VimError::ApiError(status.as_u16(), text.to_string())
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取配置
    pub fn config(&self) -> &VimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vim_client_creation() {
        let client = VimClient::new(
            &VimClient::endpoint("vcenter.lab.local", 443),
            VimConfig::default(),
        );
        assert!(client.is_ok());
        assert_eq!(
            client.unwrap().base_url(),
            "https://vcenter.lab.local/sdk/vim25/8.0.1.0"
        );
    }

    #[test]
    fn test_custom_port_and_release() {
        let config = VimConfig {
            api_release: "8.0.2.0".to_string(),
            ..Default::default()
        };
        let client = VimClient::new(&VimClient::endpoint("10.0.0.5", 8443), config).unwrap();
        assert_eq!(client.base_url(), "https://10.0.0.5:8443/sdk/vim25/8.0.2.0");
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = VimClient::new("not a url", VimConfig::default());
        assert!(matches!(result, Err(VimError::ConfigError(_))));
    }

    #[test]
    fn test_empty_release_rejected() {
        let config = VimConfig {
            api_release: String::new(),
            ..Default::default()
        };
        let result = VimClient::new("https://vc", config);
        assert!(matches!(result, Err(VimError::ConfigError(_))));
    }

    #[test]
    fn test_parse_fault_body() {
        let body = r#"{"_typeName":"InvalidLogin","faultMessage":[{"_typeName":"LocalizableMessage","key":"k","message":"Cannot complete login due to an incorrect user name or password."}]}"#;
        match VimClient::parse_fault(StatusCode::INTERNAL_SERVER_ERROR, body) {
            VimError::Fault { fault_type, message } => {
                assert_eq!(fault_type, "InvalidLogin");
                assert!(message.contains("incorrect user name"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fault_without_messages_uses_type() {
        let body = r#"{"_typeName":"NotAuthenticated","faultMessage":[]}"#;
        match VimClient::parse_fault(StatusCode::INTERNAL_SERVER_ERROR, body) {
            VimError::Fault { fault_type, message } => {
                assert_eq!(fault_type, "NotAuthenticated");
                assert_eq!(message, "NotAuthenticated");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_fault_errors() {
        assert!(matches!(
            VimClient::parse_fault(StatusCode::UNAUTHORIZED, "denied"),
            VimError::AuthError(_)
        ));
        assert!(matches!(
            VimClient::parse_fault(StatusCode::NOT_FOUND, "missing"),
            VimError::NotFound(_)
        ));
        assert!(matches!(
            VimClient::parse_fault(StatusCode::BAD_GATEWAY, "<html>"),
            VimError::ApiError(502, _)
        ));
    }

    #[test]
    fn test_parse_empty_body_as_unit() {
        let unit: Result<()> = VimClient::parse_body("");
        assert!(unit.is_ok());
        let name: String = VimClient::parse_body("\"web-01\"").unwrap();
        assert_eq!(name, "web-01");
    }

    #[test]
    fn test_parse_unset_array_property() {
        use crate::models::OptionValue;

        for body in ["", "null", "[]"] {
            let list: Option<Vec<OptionValue>> = VimClient::parse_body(body).unwrap();
            assert!(list.unwrap_or_default().is_empty(), "body: {:?}", body);
        }

        let morefs: Option<Vec<ManagedObjectReference>> = VimClient::parse_body("null").unwrap();
        assert!(morefs.is_none());

        let body = r#"[{"_typeName":"OptionValue","key":"com.vmware.opaquenetwork.segment.path","value":{"_typeName":"string","_value":"/infra/segments/seg-app"}}]"#;
        let list: Option<Vec<OptionValue>> = VimClient::parse_body(body).unwrap();
        let list = list.unwrap_or_default();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].as_str(), Some("/infra/segments/seg-app"));
    }

    #[tokio::test]
    async fn test_property_list_requires_session() {
        let client = VimClient::new("https://vc", VimConfig::default()).unwrap();
        let host = ManagedObjectReference::new(kind::HOST_SYSTEM, "host-10");
        let result: Result<Vec<ManagedObjectReference>> = client.property_list(&host, "network").await;
        assert!(matches!(result, Err(VimError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_request_requires_session() {
        let client = VimClient::new("https://vc", VimConfig::default()).unwrap();
        assert!(!client.is_connected().await);
        let vm = ManagedObjectReference::new(kind::VIRTUAL_MACHINE, "vm-1");
        let result: Result<String> = client.property(&vm, "name").await;
        assert!(matches!(result, Err(VimError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_logout_without_session_is_noop() {
        let mut client = VimClient::new("https://vc", VimConfig::default()).unwrap();
        assert!(client.logout().await.is_ok());
        assert!(client.content().is_err());
    }
}
