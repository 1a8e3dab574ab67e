mod home;
pub use home::HomeView;

mod character_list;
pub use character_list::CharacterListView;

mod character_select;
pub use character_select::CharacterSelectView;

mod character_sheet;
pub use character_sheet::CharacterSheetView;
