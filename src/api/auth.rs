use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::api::{
        account::AccountCredentials,
        auth::{AuthToken, AUTH_TOKEN_COOKIE},
    },
    service::LedgerService,
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![login, logout]
}

/// Log in with any account's credentials. Whether the account may mutate the
/// election is decided per request.
#[post("/auth/login", data = "<credentials>", format = "json")]
pub async fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<AccountCredentials>,
    service: &State<LedgerService>,
    config: &State<Config>,
) -> Result<()> {
    let account = service.login(&credentials).await?.ok_or_else(|| {
        Error::Status(
            Status::Unauthorized,
            "No account found with the provided username and password combination.".to_string(),
        )
    })?;

    let token = AuthToken::new(&account);
    cookies.add(token.into_cookie(config));

    Ok(())
}

#[delete("/auth")]
pub fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}

#[cfg(test)]
mod tests {
    use rocket::{http::ContentType, local::asynchronous::Client, serde::json::serde_json::json};

    use super::*;

    #[backend_test]
    async fn login_valid(client: Client) {
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(AccountCredentials::operator()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn login_invalid(client: Client) {
        // Unknown username.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(AccountCredentials::empty()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));

        // Wrong password.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(
                json!({
                    "username": &AccountCredentials::operator().username,
                    "password": "",
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }

    #[backend_test(operator)]
    async fn logout(client: Client) {
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());

        let response = client.delete(uri!(logout)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(None, client.cookies().get(AUTH_TOKEN_COOKIE));
    }
}
