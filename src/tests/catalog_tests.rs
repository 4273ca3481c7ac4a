use super::support::{
    users_document, ConstantEncoder, FailingEncoder, SlowShortTextEncoder, TableEncoder,
};
use crate::catalog::{CatalogBuilder, EndpointCatalog, UnindexedOperation};
use crate::encoder::HashingEncoder;
use crate::{ApiDocument, SearchError};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn builds_one_operation_per_path_and_method() -> anyhow::Result<()> {
    let catalog = EndpointCatalog::build(&users_document(), &HashingEncoder::default()).await?;

    let keys: Vec<(&str, &str)> = catalog
        .iter()
        .map(|op| (op.method.as_str(), op.path.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("GET", "/users"), ("POST", "/users"), ("GET", "/users/{id}")]
    );
    assert_eq!(catalog.dimension(), Some(384));
    assert!(catalog.iter().all(|op| op.dimension() == 384));

    let post = &catalog.operations()[1];
    assert_eq!(
        post.description,
        "POST /users Create a new user Creates a new user in the system"
    );
    assert!(post.parameters.is_empty());

    let get_user = &catalog.operations()[2];
    assert_eq!(
        get_user.parameters,
        vec![json!({ "name": "id", "in": "path", "description": "The user ID" })]
    );
    Ok(())
}

#[tokio::test]
async fn repeated_builds_are_identical() -> anyhow::Result<()> {
    let encoder = HashingEncoder::default();
    let first = EndpointCatalog::build(&users_document(), &encoder).await?;
    let second = EndpointCatalog::build(&users_document(), &encoder).await?;

    assert_eq!(first.operations(), second.operations());
    Ok(())
}

#[tokio::test]
async fn concurrent_encoding_keeps_document_order() -> anyhow::Result<()> {
    let encoder = SlowShortTextEncoder {
        inner: HashingEncoder::default(),
    };
    let builder = CatalogBuilder::with_concurrency(3)?;
    let catalog = builder.build(&users_document(), &encoder).await?;

    let sequential = CatalogBuilder::with_concurrency(1)?
        .build(&users_document(), &HashingEncoder::default())
        .await?;
    assert_eq!(catalog.operations(), sequential.operations());
    Ok(())
}

#[tokio::test]
async fn missing_paths_is_malformed() {
    let document = ApiDocument::new(json!({ "openapi": "3.0.0" }));
    let err = EndpointCatalog::build(&document, &HashingEncoder::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedSpec(_)), "got {:?}", err);
}

#[tokio::test]
async fn non_mapping_path_is_malformed() {
    let document = ApiDocument::new(json!({ "paths": { "/users": ["get"] } }));
    let err = EndpointCatalog::build(&document, &HashingEncoder::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedSpec(_)), "got {:?}", err);
}

#[tokio::test]
async fn non_mapping_operation_is_malformed() {
    let document = ApiDocument::new(json!({ "paths": { "/users": { "get": "List users" } } }));
    let err = EndpointCatalog::build(&document, &HashingEncoder::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedSpec(_)), "got {:?}", err);
}

#[tokio::test]
async fn path_item_fields_are_not_operations() -> anyhow::Result<()> {
    let document = ApiDocument::new(json!({
        "paths": {
            "/pets/{id}": {
                "summary": "A single pet",
                "parameters": [ { "name": "id", "in": "path" } ],
                "get": { "summary": "Fetch a pet" }
            }
        }
    }));

    let operations = CatalogBuilder::collect_operations(&document)?;
    assert_eq!(
        operations,
        vec![UnindexedOperation {
            path: "/pets/{id}".to_string(),
            method: "GET".to_string(),
            description: "GET /pets/{id} Fetch a pet".to_string(),
            parameters: vec![],
        }]
    );
    Ok(())
}

#[tokio::test]
async fn empty_paths_give_an_empty_catalog() -> anyhow::Result<()> {
    let document = ApiDocument::new(json!({ "paths": {} }));
    let catalog = EndpointCatalog::build(&document, &HashingEncoder::default()).await?;

    assert!(catalog.is_empty());
    assert_eq!(catalog.dimension(), None);
    Ok(())
}

#[tokio::test]
async fn encoder_failure_aborts_the_build() {
    let encoder = FailingEncoder::new("POST");
    let err = EndpointCatalog::build(&users_document(), &encoder)
        .await
        .unwrap_err();

    match err {
        SearchError::Encoding { text, .. } => assert!(text.starts_with("POST /users")),
        other => panic!("expected encoding error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_vector_is_an_encoding_error() {
    let err = EndpointCatalog::build(&users_document(), &ConstantEncoder(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Encoding { .. }), "got {:?}", err);
}

#[tokio::test]
async fn non_finite_vector_is_an_encoding_error() {
    let err = EndpointCatalog::build(&users_document(), &ConstantEncoder(vec![1.0, f32::NAN]))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Encoding { .. }), "got {:?}", err);
}

#[tokio::test]
async fn mixed_dimensions_are_rejected() {
    let document = ApiDocument::new(json!({
        "paths": { "/a": { "get": {} }, "/b": { "get": {} } }
    }));
    let encoder = TableEncoder::new(&[("GET /a", vec![1.0, 0.0]), ("GET /b", vec![1.0, 0.0, 0.0])]);

    let err = EndpointCatalog::build(&document, &encoder).await.unwrap_err();
    assert!(
        matches!(err, SearchError::DimensionMismatch { expected: 2, actual: 3 }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn encoder_reported_dimension_must_match() {
    struct LyingEncoder(HashingEncoder);

    #[async_trait::async_trait]
    impl crate::TextEncoder for LyingEncoder {
        async fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(self.0.embed(text))
        }

        fn dimension(&self) -> Option<usize> {
            Some(8)
        }
    }

    let encoder = LyingEncoder(HashingEncoder::new(16).unwrap());
    let err = EndpointCatalog::build(&users_document(), &encoder)
        .await
        .unwrap_err();
    assert!(
        matches!(err, SearchError::DimensionMismatch { expected: 8, actual: 16 }),
        "got {:?}",
        err
    );
}

#[test]
fn zero_concurrency_is_rejected() {
    let err = CatalogBuilder::with_concurrency(0).unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)), "got {:?}", err);
}

#[tokio::test]
async fn extension_keys_are_not_operations() -> anyhow::Result<()> {
    let document = ApiDocument::new(json!({
        "paths": {
            "/orders": {
                "x-internal": true,
                "x-rate-limit": { "per_minute": 60 },
                "get": { "summary": "List orders" }
            }
        }
    }));

    let catalog = EndpointCatalog::build(&document, &HashingEncoder::default()).await?;
    let keys: Vec<(&str, &str)> = catalog
        .iter()
        .map(|op| (op.method.as_str(), op.path.as_str()))
        .collect();
    assert_eq!(keys, vec![("GET", "/orders")]);
    Ok(())
}
