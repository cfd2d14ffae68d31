use std::fs;

use oact_core::config::OactConfig;
use oact_core::ir::IrSpec;
use oact_core::{CodeGenerator, GeneratedFile, parse, pipeline, transform};
use oact_rust_activity::ActivityGenerator;
use oact_rust_activity::emitters::{contract, implementation};

const PETSTORE: &str = include_str!("../../oact-core/tests/fixtures/petstore.yaml");
const PETSTORE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../oact-core/tests/fixtures/petstore.yaml"
);

fn petstore() -> IrSpec {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    transform::transform(&spec).unwrap()
}

fn generate(config: &OactConfig) -> Vec<GeneratedFile> {
    ActivityGenerator.generate(&petstore(), config).unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.path == path)
        .map(|f| f.content.as_str())
        .unwrap_or_else(|| panic!("should generate {path}"))
}

#[test]
fn generates_expected_files() {
    let files = generate(&OactConfig::default());
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    insta::assert_debug_snapshot!(paths, @r#"
    [
        "api_activity.rs",
        "api_activity_impl.rs",
        "models/pet.rs",
        "models/new_pet.rs",
        "models/owner.rs",
        "models/problem.rs",
        "models/mod.rs",
        "mod.rs",
    ]
    "#);
}

#[test]
fn feature_flags_drop_files() {
    let config = OactConfig {
        generate_implementation: false,
        generate_models: false,
        ..OactConfig::default()
    };
    let files = generate(&config);
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["api_activity.rs", "mod.rs"]);

    let module = file(&files, "mod.rs");
    assert!(module.contains("pub mod api_activity;\n"));
    assert!(!module.contains("api_activity_impl"));
    assert!(!module.contains("pub mod models;"));
}

#[test]
fn contract_declares_options_and_methods() {
    let files = generate(&OactConfig::default());
    let src = file(&files, "api_activity.rs");

    assert!(src.contains("pub const API_ERROR: &str = \"API_ERROR\";"));
    assert!(src.contains("pub trait ApiActivity {"));
    assert!(src.contains(
        "    const CREATE_PET_OPTIONS: ActivityOptions = options::CREATE_PET;\n"
    ));
    assert!(src.contains(
        "    pub const CREATE_PET: ActivityOptions = ActivityOptions {
        schedule_to_close_timeout: SCHEDULE_TO_CLOSE_TIMEOUT,
        retry_policy: RetryPolicy {
            initial_interval: Duration::from_secs(2),
            maximum_interval: Duration::from_secs(60),
            backoff_coefficient: 1.5,
            maximum_attempts: 2,
        },
    };"
    ));
    assert!(src.contains(
        "    pub const GETPETSID: ActivityOptions = ActivityOptions {
        schedule_to_close_timeout: SCHEDULE_TO_CLOSE_TIMEOUT,
        retry_policy: RetryPolicy {
            initial_interval: Duration::from_secs(1),
            maximum_interval: Duration::from_secs(300),
            backoff_coefficient: 2.0,
            maximum_attempts: 5,
        },
    };"
    ));
    assert!(src.contains("Duration::from_secs(300);"));
    assert!(src.contains("        \"getpetsid\" => Some(options::GETPETSID),\n"));
}

#[test]
fn contract_documents_operations() {
    let files = generate(&OactConfig::default());
    let src = file(&files, "api_activity.rs");

    assert!(src.contains(
        "    /// Create a pet
    ///
    /// Adds a pet to the store.
    ///
    /// `POST /pets`
    ///
    /// Not idempotent: retry with caution.
    fn create_pet(
        &self,
        request: requests::CreatePetRequest,
    ) -> impl Future<Output = Result<crate::client::models::Pet, ActivityFailure>> + Send;"
    ));
    assert!(src.contains(
        "    /// Info for a specific pet
    ///
    /// `GET /pets/{id}`
    ///
    /// Idempotent: safe to retry.
    fn getpetsid(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<crate::client::models::Pet, ActivityFailure>> + Send;"
    ));
    assert!(src.contains("    #[deprecated]\n    fn delete_pet(\n"));
    assert!(src.contains(
        "    ) -> impl Future<Output = Result<(), ActivityFailure>> + Send;"
    ));
}

#[test]
fn contract_request_objects() {
    let files = generate(&OactConfig::default());
    let src = file(&files, "api_activity.rs");

    assert!(src.contains(
        "    /// Arguments of [`super::ApiActivity::create_pet`].
    #[derive(Debug, Clone)]
    pub struct CreatePetRequest {
        pub x_request_id: uuid::Uuid,
        pub dry_run: Option<bool>,
        pub body: crate::client::models::NewPet,
    }"
    ));
    assert!(src.contains("pub struct SearchStoreRequest {"));
    assert!(src.contains("pub struct UpdatePetRequest {"));
    assert!(src.contains("pub struct UploadPhotoRequest {"));
    assert!(!src.contains("pub struct ListPetsRequest"));
    assert!(!src.contains("pub struct GetpetsidRequest"));
}

#[test]
fn implementation_delegates_to_client() {
    let files = generate(&OactConfig::default());
    let src = file(&files, "api_activity_impl.rs");

    assert!(src.contains(
        "use crate::generated::api_activity::{API_ERROR, ActivityFailure, ApiActivity, requests};"
    ));
    assert!(src.contains(
        "type Configuration = crate::client::apis::configuration::Configuration;"
    ));
    assert!(src.contains("impl ApiActivity for ApiActivityImpl {"));
    assert!(src.contains(
        "    async fn create_pet(
        &self,
        request: requests::CreatePetRequest,
    ) -> Result<crate::client::models::Pet, ActivityFailure> {
        crate::client::apis::pets_api::create_pet(
            &self.configuration,
            request.x_request_id,
            request.dry_run,
            request.body,
        )
        .await
        .map_err(|err| ActivityFailure::new(API_ERROR, format!(\"API call failed: {err}\")))
    }"
    ));
    assert!(src.contains(
        "        crate::client::apis::pets_api::delete_pet(
            &self.configuration,
            id,
        )
        .await
        .map(|_| ())
        .map_err("
    ));
    assert!(src.contains("crate::client::apis::default_api::search_store("));
}

#[test]
fn contract_and_implementation_agree_on_flattening() {
    let ir = petstore();
    for op in &ir.operations {
        let params = contract::parameters(op);
        let call = implementation::call_arguments(op);
        assert_eq!(call.len(), op.arguments().len(), "{}", op.name);
        if op.uses_request_object() {
            assert_eq!(params.len(), 1, "{}", op.name);
            assert!(call.iter().all(|a| a.starts_with("request.")), "{}", op.name);
        } else {
            assert_eq!(params.len(), call.len(), "{}", op.name);
            for (param, arg) in params.iter().zip(&call) {
                assert!(param.starts_with(&format!("{arg}: ")), "{}", op.name);
            }
        }
    }
}

#[test]
fn models_follow_schema() {
    let files = generate(&OactConfig::default());
    let pet = file(&files, "models/pet.rs");

    assert!(pet.contains(
        "/// A pet for sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(rename = \"id\")]
    id: i64,
    #[serde(rename = \"name\")]
    name: String,
    /// Free-form label.
    #[serde(rename = \"tag\", default, skip_serializing_if = \"Option::is_none\")]
    tag: Option<String>,
    #[serde(rename = \"birth_date\", default, skip_serializing_if = \"Option::is_none\")]
    birth_date: Option<chrono::NaiveDate>,
    #[serde(rename = \"owner\", default, skip_serializing_if = \"Option::is_none\")]
    owner: Option<crate::client::models::Owner>,
    #[serde(rename = \"attributes\", default, skip_serializing_if = \"Option::is_none\")]
    attributes: Option<std::collections::HashMap<String, String>>,
}"
    ));
    assert!(pet.contains(
        "    pub fn new(id: i64, name: String, tag: Option<String>, birth_date: Option<chrono::NaiveDate>, owner: Option<crate::client::models::Owner>, attributes: Option<std::collections::HashMap<String, String>>) -> Self {"
    ));
    assert!(pet.contains(
        "    pub fn birth_date(&self) -> &Option<chrono::NaiveDate> {
        &self.birth_date
    }

    pub fn set_birth_date(&mut self, birth_date: Option<chrono::NaiveDate>) {
        self.birth_date = birth_date;
    }"
    ));

    let owner = file(&files, "models/owner.rs");
    assert!(owner.contains("    #[serde(rename = \"nick-name\", default, skip_serializing_if = \"Option::is_none\")]\n    nick_name: Option<String>,"));
    assert!(owner.contains("    pub fn r#type(&self) -> &Option<String> {"));
    assert!(owner.contains("    pub fn set_type(&mut self, r#type: Option<String>) {"));

    // Empty has no properties
    assert!(!files.iter().any(|f| f.path == "models/empty.rs"));
    let models = file(&files, "models/mod.rs");
    assert!(models.contains("mod pet;\nmod new_pet;\nmod owner;\nmod problem;\n\npub use pet::Pet;\n"));
}

#[test]
fn self_referential_model_is_boxed() {
    let spec = parse::from_yaml(
        r##"
openapi: "3.0.3"
info:
  title: Tree
  version: "1"
paths: {}
components:
  schemas:
    Node:
      type: object
      properties:
        next:
          $ref: "#/components/schemas/Node"
        children:
          type: array
          items:
            $ref: "#/components/schemas/Node"
"##,
    )
    .unwrap();
    let ir = transform::transform(&spec).unwrap();
    let files = ActivityGenerator.generate(&ir, &OactConfig::default()).unwrap();
    let node = file(&files, "models/node.rs");
    assert!(node.contains("    next: Option<Box<crate::client::models::Node>>,\n"));
    assert!(node.contains("    children: Option<Vec<crate::client::models::Node>>,\n"));
}

#[test]
fn required_self_reference_is_optional() {
    let spec = parse::from_yaml(
        r##"
openapi: "3.0.3"
info:
  title: Chain
  version: "1"
paths: {}
components:
  schemas:
    Link:
      type: object
      required: [next]
      properties:
        next:
          $ref: "#/components/schemas/Link"
"##,
    )
    .unwrap();
    let ir = transform::transform(&spec).unwrap();
    let files = ActivityGenerator.generate(&ir, &OactConfig::default()).unwrap();
    let link = file(&files, "models/link.rs");
    assert!(link.contains(
        "    #[serde(rename = \"next\", default, skip_serializing_if = \"Option::is_none\")]\n    next: Option<Box<crate::client::models::Link>>,\n"
    ));
    assert!(!link.contains("    next: Box<"));
}

#[test]
fn reference_names_match_model_structs() {
    let spec = parse::from_yaml(
        r##"
openapi: "3.0.3"
info:
  title: Status
  version: "1"
paths:
  /status:
    get:
      operationId: getStatus
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/pet-status"
components:
  schemas:
    pet-status:
      type: object
      properties:
        state:
          type: string
"##,
    )
    .unwrap();
    let config = OactConfig {
        model_namespace: "crate::generated::models".to_string(),
        ..OactConfig::default()
    };
    let ir = transform::transform_with_options(&spec, &config.transform_options()).unwrap();
    let files = ActivityGenerator.generate(&ir, &config).unwrap();

    let model = file(&files, "models/pet_status.rs");
    assert!(model.contains("pub struct PetStatus {"));
    assert!(file(&files, "models/mod.rs").contains("pub use pet_status::PetStatus;"));

    let returns = "Result<crate::generated::models::PetStatus, ActivityFailure>";
    assert!(file(&files, "api_activity.rs").contains(returns));
    assert!(file(&files, "api_activity_impl.rs").contains(returns));
    assert!(!file(&files, "api_activity.rs").contains("pet-status,"));
}

#[test]
fn colliding_operation_ids_get_distinct_items() {
    let spec = parse::from_yaml(
        r#"
openapi: "3.0.3"
info:
  title: Collisions
  version: "1"
paths:
  /a:
    get:
      operationId: getPet
  /b:
    get:
      operationId: get_pet
"#,
    )
    .unwrap();
    let ir = transform::transform(&spec).unwrap();
    let files = ActivityGenerator.generate(&ir, &OactConfig::default()).unwrap();
    let contract = file(&files, "api_activity.rs");

    assert_eq!(contract.matches("pub const GET_PET: ActivityOptions").count(), 1);
    assert_eq!(contract.matches("pub const GET_PET_2: ActivityOptions").count(), 1);
    assert_eq!(contract.matches("fn get_pet(").count(), 1);
    assert_eq!(contract.matches("fn get_pet_2(").count(), 1);
}

#[test]
fn pipeline_writes_and_regenerates_identically() {
    let dir = tempfile::tempdir().unwrap();
    let config = OactConfig {
        input: PETSTORE_PATH.to_string(),
        output: dir.path().join("generated").display().to_string(),
        ..OactConfig::default()
    };

    let first = pipeline::run(&config, &ActivityGenerator).unwrap();
    assert_eq!(first.operations, 7);
    assert_eq!(first.models, 5);
    assert_eq!(first.written.len(), 8);
    assert!(dir.path().join("generated/models/pet.rs").is_file());

    let before: Vec<Vec<u8>> = first
        .written
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();

    let second = pipeline::run(&config, &ActivityGenerator).unwrap();
    assert_eq!(second, first);
    let after: Vec<Vec<u8>> = second
        .written
        .iter()
        .map(|p| fs::read(p).unwrap())
        .collect();
    assert_eq!(before, after);
}
