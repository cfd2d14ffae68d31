use oact_core::transform::name_normalizer::{normalize_name, synthesize_operation_id, to_field_name};

#[test]
fn test_camel_case_input() {
    let n = normalize_name("createPet");
    assert_eq!(n.pascal_case, "CreatePet");
    assert_eq!(n.camel_case, "createPet");
    assert_eq!(n.snake_case, "create_pet");
    assert_eq!(n.screaming_snake, "CREATE_PET");
}

#[test]
fn test_pascal_case_input() {
    let n = normalize_name("PetOwner");
    assert_eq!(n.pascal_case, "PetOwner");
    assert_eq!(n.camel_case, "petOwner");
    assert_eq!(n.snake_case, "pet_owner");
}

#[test]
fn test_kebab_case_input() {
    let n = normalize_name("pet-store-api");
    assert_eq!(n.pascal_case, "PetStoreApi");
    assert_eq!(n.camel_case, "petStoreApi");
}

#[test]
fn test_path_like_input() {
    let n = normalize_name("/pets/{petId}");
    assert_eq!(n.pascal_case, "PetsPetId");
}

#[test]
fn test_synthesized_operation_id() {
    let id = synthesize_operation_id("PATCH", "/pets/{pet-id}/photo");
    assert_eq!(id, "patchpetspetidphoto");
    let n = normalize_name(&id);
    assert_eq!(n.pascal_case, "Patchpetspetidphoto");
    assert_eq!(n.screaming_snake, "PATCHPETSPETIDPHOTO");
}

#[test]
fn test_field_names() {
    assert_eq!(to_field_name("X_Request_ID"), "xRequestID");
    assert_eq!(to_field_name("nick-name"), "nickName");
    assert_eq!(to_field_name("birth_date"), "birthDate");
    assert_eq!(to_field_name("type"), "type");
}
