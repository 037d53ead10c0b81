use jobboard_auth::form::{FieldSet, FormModel};

#[derive(Clone, jobboard_auth::form::FormModel)]
struct ContactForm {
    name: String,
    email: String,
}

fn main() {
    let fields = ContactForm::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(ContactForm::field_keys().len(), 2);

    let mut set = FieldSet::new();
    set.set_field(fields.name(), "Ada");
    let model = ContactForm::from_field_set(&set);
    assert_eq!(model.name, "Ada");
    assert_eq!(model.email, "");
    assert_eq!(model.to_field_set().value("name"), "Ada");
}
