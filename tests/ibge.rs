use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ecoleta::entities::{City, Uf};
use ecoleta::external::ibge;

#[tokio::test]
async fn ufs_are_sorted_codes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/localidades/estados"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 35, "sigla": "SP", "nome": "São Paulo" },
            { "id": 26, "sigla": "PE", "nome": "Pernambuco" },
            { "id": 12, "sigla": "AC", "nome": "Acre" },
        ])))
        .mount(&server)
        .await;

    let ufs = ibge::list_ufs(&reqwest::Client::new(), &server.uri())
        .await
        .unwrap();

    assert_eq!(
        ufs,
        vec![Uf("AC".into()), Uf("PE".into()), Uf("SP".into())]
    );
}

#[tokio::test]
async fn cities_keep_api_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/localidades/estados/PE/municipios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2611606, "nome": "Recife" },
            { "id": 2609600, "nome": "Olinda" },
        ])))
        .mount(&server)
        .await;

    let cities = ibge::list_cities(&reqwest::Client::new(), &server.uri(), &Uf("PE".into()))
        .await
        .unwrap();

    assert_eq!(cities, vec![City("Recife".into()), City("Olinda".into())]);
}

#[tokio::test]
async fn client_errors_are_invalid_input() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = ibge::list_cities(&reqwest::Client::new(), &server.uri(), &Uf("ZZ".into()))
        .await
        .unwrap_err();

    assert!(err.is_invalid_input_error());
}

#[tokio::test]
async fn server_errors_and_bad_bodies_are_upstream_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/localidades/estados"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/localidades/estados/PE/municipios"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();

    let err = ibge::list_ufs(&client, &server.uri()).await.unwrap_err();
    assert_eq!(err.code, 4);

    let err = ibge::list_cities(&client, &server.uri(), &Uf("PE".into()))
        .await
        .unwrap_err();
    assert_eq!(err.code, 4);
}
