pub mod worklist;

pub use worklist::load_worklist;
