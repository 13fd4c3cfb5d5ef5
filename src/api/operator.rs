use rocket::{serde::json::Json, Route, State};

use crate::{
    error::Result,
    logging::RequestId,
    model::api::{
        account::{AccountCredentials, OperatorTransfer},
        auth::AuthToken,
    },
    service::LedgerService,
};

pub fn routes() -> Vec<Route> {
    routes![
        get_operator,
        transfer_operator,
        renounce_operator,
        get_accounts,
        create_account,
    ]
}

/// The username of the current operator, or `null` if the role was renounced.
#[get("/operator")]
async fn get_operator(service: &State<LedgerService>) -> Result<Json<Option<String>>> {
    let operator = service.operator().await?;
    Ok(Json(operator.map(|account| account.account.username)))
}

#[put("/operator", data = "<transfer>", format = "json")]
async fn transfer_operator(
    token: AuthToken,
    request: &RequestId,
    transfer: Json<OperatorTransfer>,
    service: &State<LedgerService>,
) -> Result<()> {
    debug!("req{request} transferring operator role to {}", transfer.username);
    service.transfer_operator(token.id, &transfer.username).await
}

#[delete("/operator")]
async fn renounce_operator(
    token: AuthToken,
    request: &RequestId,
    service: &State<LedgerService>,
) -> Result<()> {
    debug!("req{request} renouncing operator role");
    service.renounce_operator(token.id).await
}

#[get("/accounts")]
async fn get_accounts(
    _token: AuthToken,
    service: &State<LedgerService>,
) -> Result<Json<Vec<String>>> {
    let usernames = service
        .list_accounts()
        .await?
        .into_iter()
        .map(|account| account.account.username)
        .collect();
    Ok(Json(usernames))
}

#[post("/accounts", data = "<credentials>", format = "json")]
async fn create_account(
    token: AuthToken,
    credentials: Json<AccountCredentials>,
    service: &State<LedgerService>,
) -> Result<()> {
    service
        .create_account(token.id, credentials.into_inner())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json::{self, json},
    };

    use super::*;
    use crate::ledger::JurisdictionResult;

    #[backend_test(operator)]
    async fn create_and_list_accounts(client: Client) {
        create(&client, &AccountCredentials::example1(), Status::Ok).await;
        create(&client, &AccountCredentials::example2(), Status::Ok).await;

        // Duplicates and bad credentials are refused.
        create(&client, &AccountCredentials::example1(), Status::Conflict).await;
        create(&client, &AccountCredentials::empty(), Status::BadRequest).await;

        let response = client.get(uri!(get_accounts)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let mut accounts: Vec<String> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        accounts.sort();
        let mut expected = vec![
            AccountCredentials::operator().username,
            AccountCredentials::example1().username,
            AccountCredentials::example2().username,
        ];
        expected.sort();
        assert_eq!(accounts, expected);
    }

    #[backend_test]
    async fn accounts_need_login(client: Client) {
        let response = client.get(uri!(get_accounts)).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        create(&client, &AccountCredentials::example1(), Status::Unauthorized).await;
    }

    #[backend_test(operator)]
    async fn transfer_then_renounce(client: Client) {
        assert_eq!(
            get_operator_name(&client).await,
            Some(AccountCredentials::operator().username)
        );

        // Unknown accounts can't receive the role.
        transfer(&client, "nobody-here", Status::NotFound).await;

        // Hand over to alice.
        create(&client, &AccountCredentials::example1(), Status::Ok).await;
        transfer(&client, &AccountCredentials::example1().username, Status::Ok).await;
        assert_eq!(
            get_operator_name(&client).await,
            Some(AccountCredentials::example1().username)
        );

        // The old operator can no longer submit, transfer or renounce.
        let response = client
            .post("/results")
            .header(ContentType::JSON)
            .body(serde_json::to_string(&JurisdictionResult::ohio()).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        transfer(&client, &AccountCredentials::operator().username, Status::Unauthorized).await;
        let response = client.delete(uri!(renounce_operator)).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        // Alice gives the role up entirely.
        login(&client, &AccountCredentials::example1()).await;
        let response = client.delete(uri!(renounce_operator)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(get_operator_name(&client).await, None);
        let response = client.post("/close").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    async fn create(client: &Client, credentials: &AccountCredentials, status: Status) {
        let response = client
            .post(uri!(create_account))
            .header(ContentType::JSON)
            .body(json!(credentials).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), status);
    }

    async fn transfer(client: &Client, username: &str, status: Status) {
        let transfer = OperatorTransfer {
            username: username.to_string(),
        };
        let response = client
            .put(uri!(transfer_operator))
            .header(ContentType::JSON)
            .body(json!(transfer).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), status);
    }

    async fn login(client: &Client, credentials: &AccountCredentials) {
        let response = client
            .post("/auth/login")
            .header(ContentType::JSON)
            .body(json!(credentials).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    async fn get_operator_name(client: &Client) -> Option<String> {
        let response = client.get(uri!(get_operator)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }
}
