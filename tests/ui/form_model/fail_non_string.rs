#[derive(jobboard_auth::form::FormModel)]
struct ProfileForm {
    name: String,
    age: u32,
}

fn main() {}
