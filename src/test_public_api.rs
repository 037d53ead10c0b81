use crate::form::FormModel as _;

#[test]
fn prelude_exports_the_sign_in_stack() {
    use crate::prelude::*;
    use std::sync::Arc;

    let backend = InMemoryAuthBackend::new();
    let session = SessionContext::new(Arc::new(backend.clone()));
    let page = SignInPage::new(&AppConfig::default().schemas, Arc::new(backend), session);
    assert!(page.register_dialog().is_none());
    assert_eq!(page.sign_in_form().flow(), AuthFlow::SignIn);
}

#[test]
fn derived_credentials_expose_field_keys() {
    let fields = crate::auth::Credentials::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(fields.password().as_str(), "password");
    assert_eq!(
        crate::auth::Credentials::field_keys(),
        &[fields.email(), fields.password()]
    );
}

#[test]
fn credentials_round_trip_through_field_set() {
    let credentials = crate::auth::Credentials::new("a@b.com", "secret");
    let set = credentials.to_field_set();
    assert_eq!(set.value("email"), "a@b.com");
    assert_eq!(crate::auth::Credentials::from_field_set(&set), credentials);
}

#[test]
fn credentials_debug_hides_password() {
    let rendered = format!("{:?}", crate::auth::Credentials::new("a@b.com", "secret"));
    assert!(rendered.contains("a@b.com"));
    assert!(!rendered.contains("secret"));
}
