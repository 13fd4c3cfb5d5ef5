use rocket::Route;

mod auth;
mod ledger;
mod operator;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(ledger::routes());
    routes.extend(operator::routes());
    routes
}
