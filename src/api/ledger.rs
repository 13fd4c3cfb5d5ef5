use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    ledger::{Candidate, JurisdictionResult, Tally},
    logging::RequestId,
    model::api::auth::AuthToken,
    service::LedgerService,
};

pub fn routes() -> Vec<Route> {
    routes![
        submit_result,
        get_results,
        get_result,
        current_leader,
        election_ended,
        tally,
        close,
    ]
}

#[post("/results", data = "<result>", format = "json")]
async fn submit_result(
    token: AuthToken,
    request: &RequestId,
    result: Json<JurisdictionResult>,
    service: &State<LedgerService>,
) -> Result<()> {
    debug!("req{request} submitting {} for {}", result.name, token.id);
    service.submit_result(token.id, result.into_inner()).await
}

#[get("/results")]
fn get_results(service: &State<LedgerService>) -> Json<Vec<JurisdictionResult>> {
    Json(service.snapshot().results().cloned().collect())
}

#[get("/results/<name>")]
fn get_result(name: &str, service: &State<LedgerService>) -> Result<Json<JurisdictionResult>> {
    service
        .snapshot()
        .result(name)
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::Status(Status::NotFound, format!("No result for {name}")))
}

#[get("/leader")]
fn current_leader(service: &State<LedgerService>) -> Json<Candidate> {
    Json(service.snapshot().current_leader())
}

#[get("/ended")]
fn election_ended(service: &State<LedgerService>) -> Json<bool> {
    Json(service.snapshot().election_ended())
}

#[get("/tally")]
fn tally(service: &State<LedgerService>) -> Json<Tally> {
    Json(service.snapshot().tally())
}

#[post("/close")]
async fn close(
    token: AuthToken,
    request: &RequestId,
    service: &State<LedgerService>,
) -> Result<()> {
    debug!("req{request} closing election for {}", token.id);
    service.close(token.id).await
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::ContentType,
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::{self, json, Value},
    };

    use super::*;
    use crate::model::api::{account::AccountCredentials, auth::AUTH_TOKEN_COOKIE};

    #[backend_test]
    async fn initial_state(client: Client) {
        assert_eq!(get_leader(&client).await, Candidate::Nobody);
        assert!(!get_ended(&client).await);
        let tally = get_tally(&client).await;
        assert_eq!(tally.seats_a, 0);
        assert_eq!(tally.seats_b, 0);
        assert_eq!(tally.jurisdictions, 0);

        // Leader is sent as a bare integer code.
        let response = client.get(uri!(current_leader)).dispatch().await;
        assert_eq!(response.into_string().await.unwrap(), "0");
    }

    #[backend_test(operator)]
    async fn full_election(client: Client) {
        // Submit a result and check the leader.
        submit(&client, &JurisdictionResult::california()).await;
        assert_eq!(get_leader(&client).await, Candidate::CandidateA);

        // Try to submit it again.
        let response = submit_raw(&client, &JurisdictionResult::california()).await;
        assert_error(response, Status::Conflict, "duplicate_jurisdiction").await;

        // Try zero seats.
        let zero_seats = JurisdictionResult::new("California", 1000, 900, 0);
        let response = submit_raw(&client, &zero_seats).await;
        assert_error(response, Status::BadRequest, "invalid_seat_count").await;

        // Try a tie.
        let tie = JurisdictionResult::new("California", 1000, 1000, 12);
        let response = submit_raw(&client, &tie).await;
        assert_error(response, Status::BadRequest, "tied_result").await;

        // A second result changes the lead.
        submit(&client, &JurisdictionResult::ohio()).await;
        assert_eq!(get_leader(&client).await, Candidate::CandidateB);
        let tally = get_tally(&client).await;
        assert_eq!(tally.seats_a, 32);
        assert_eq!(tally.seats_b, 33);
        assert_eq!(tally.jurisdictions, 2);

        // Anonymous callers can't close.
        let anonymous = Client::tracked(crate::test_rocket().await).await.unwrap();
        let response = anonymous.post(uri!(close)).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        // End the election.
        let response = client.post(uri!(close)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert!(get_ended(&client).await);
        assert_eq!(get_leader(&client).await, Candidate::CandidateB);

        // No more results accepted.
        let response = submit_raw(&client, &JurisdictionResult::texas()).await;
        assert_error(response, Status::Conflict, "election_closed").await;
        assert_eq!(get_leader(&client).await, Candidate::CandidateB);

        // Closing again is fine.
        let response = client.post(uri!(close)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert!(get_ended(&client).await);
    }

    #[backend_test(operator)]
    async fn non_operator_rejected(client: Client) {
        // Create a second account and switch to it.
        let response = client
            .post("/accounts")
            .header(ContentType::JSON)
            .body(json!(AccountCredentials::example1()).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        client.delete("/auth").dispatch().await;
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());
        let response = client
            .post("/auth/login")
            .header(ContentType::JSON)
            .body(json!(AccountCredentials::example1()).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        // Neither valid nor invalid submissions get through.
        let response = submit_raw(&client, &JurisdictionResult::california()).await;
        assert_error(response, Status::Unauthorized, "unauthorized").await;
        let zero_seats = JurisdictionResult::new("California", 1000, 900, 0);
        let response = submit_raw(&client, &zero_seats).await;
        assert_error(response, Status::Unauthorized, "unauthorized").await;

        // Nor can they close.
        let response = client.post(uri!(close)).dispatch().await;
        assert_error(response, Status::Unauthorized, "unauthorized").await;
        assert!(!get_ended(&client).await);
        assert_eq!(get_tally(&client).await.jurisdictions, 0);
    }

    #[backend_test]
    async fn anonymous_submission_rejected(client: Client) {
        let response = submit_raw(&client, &JurisdictionResult::california()).await;
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(get_leader(&client).await, Candidate::Nobody);
    }

    #[backend_test(operator)]
    async fn malformed_submission(client: Client) {
        // Negative votes don't fit the record at all.
        let response = client
            .post(uri!(submit_result))
            .header(ContentType::JSON)
            .body(json!({"name": "Ohio", "votes_a": -1, "votes_b": 5, "seats": 3}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);

        let response = submit_raw(&client, &JurisdictionResult::new("", 1, 2, 3)).await;
        assert_error(response, Status::BadRequest, "empty_jurisdiction_name").await;
        assert_eq!(get_tally(&client).await.jurisdictions, 0);
    }

    #[backend_test(operator)]
    async fn read_results(client: Client) {
        submit(&client, &JurisdictionResult::ohio()).await;
        submit(&client, &JurisdictionResult::california()).await;

        let response = client.get(uri!(get_results)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let results: Vec<JurisdictionResult> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            results,
            vec![JurisdictionResult::california(), JurisdictionResult::ohio()]
        );

        let response = client.get(uri!(get_result("Ohio"))).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let result: JurisdictionResult =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(result, JurisdictionResult::ohio());

        let response = client.get(uri!(get_result("Texas"))).dispatch().await;
        assert_error(response, Status::NotFound, "not_found").await;
    }

    async fn submit_raw<'c>(client: &'c Client, result: &JurisdictionResult) -> LocalResponse<'c> {
        client
            .post(uri!(submit_result))
            .header(ContentType::JSON)
            .body(serde_json::to_string(result).unwrap())
            .dispatch()
            .await
    }

    async fn submit(client: &Client, result: &JurisdictionResult) {
        let response = submit_raw(client, result).await;
        assert_eq!(response.status(), Status::Ok);
    }

    async fn assert_error(response: LocalResponse<'_>, status: Status, code: &str) {
        assert_eq!(response.status(), status);
        let body: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["error"], code);
    }

    async fn get_leader(client: &Client) -> Candidate {
        let response = client.get(uri!(current_leader)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    async fn get_ended(client: &Client) -> bool {
        let response = client.get(uri!(election_ended)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    async fn get_tally(client: &Client) -> Tally {
        let response = client.get(uri!(tally)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }
}
