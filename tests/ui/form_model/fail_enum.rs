#[derive(jobboard_auth::form::FormModel)]
enum LoginStep {
    Email,
    Password,
}

fn main() {}
