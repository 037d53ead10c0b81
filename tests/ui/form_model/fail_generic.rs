#[derive(jobboard_auth::form::FormModel)]
struct GenericForm<T> {
    email: String,
    extra: T,
}

fn main() {}
