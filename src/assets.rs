pub const LANDING_HTML: &str = include_str!("../frontend/index.html");
pub const REGISTER_HTML: &str = include_str!("../frontend/register.html");
pub const LOGIN_HTML: &str = include_str!("../frontend/login.html");
pub const TODOLIST_HTML: &str = include_str!("../frontend/todolist.html");
pub const EDIT_HTML: &str = include_str!("../frontend/edit.html");
pub const STYLE_CSS: &str = include_str!("../frontend/style.css");
