#[derive(jobboard_auth::form::FormModel)]
struct TupleForm(String, String);

fn main() {}
