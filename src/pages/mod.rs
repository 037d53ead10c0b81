mod signin;

pub use signin::{REGISTER_TOGGLE_LABEL, SignInPage, SignInPageView};
