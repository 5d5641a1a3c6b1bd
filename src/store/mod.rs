mod form;

pub use form::FormStore;
