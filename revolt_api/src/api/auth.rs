use crate::{
    client::{parse_json_if_ok, Credentials, RevoltClient},
    error::RevoltError,
    types::auth::{DataLogin, ResponseLogin},
    util::build_url,
};

#[async_trait::async_trait]
pub trait AuthApi {
    /// Login to a user account.
    ///
    /// On success the returned session token is installed on the client;
    /// MFA challenges and disabled accounts are handed back to the caller.
    async fn login(
        &self,
        email: &str,
        password: &str,
        friendly_name: Option<String>,
    ) -> Result<ResponseLogin, RevoltError>;
}

#[async_trait::async_trait]
impl AuthApi for RevoltClient {
    async fn login(
        &self,
        email: &str,
        password: &str,
        friendly_name: Option<String>,
    ) -> Result<ResponseLogin, RevoltError> {
        let url = build_url(&self.base_url, &["auth", "session", "login"])?;
        let body = DataLogin {
            email: email.to_string(),
            password: password.to_string(),
            friendly_name,
        };
        let resp = self.http.post(url).json(&body).send().await?;

        let login_resp: ResponseLogin = parse_json_if_ok(resp).await?;

        if let ResponseLogin::Success { token, .. } = &login_resp {
            self.set_credentials(Some(Credentials::Session(token.clone())))
                .await;
        }

        Ok(login_resp)
    }
}
