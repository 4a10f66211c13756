pub mod page_view;
pub mod toast;
pub mod toolbar;
pub mod zoom_menu;

pub use page_view::PageView;
pub use toast::Toast;
pub use toolbar::{Toolbar, ToolbarView};
pub use zoom_menu::{ZoomMenu, ZoomMenuAction};
