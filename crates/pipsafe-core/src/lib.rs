mod key;
mod reference;
mod scope;

pub use key::PackageKey;
pub use reference::PackageReference;
pub use scope::Scope;

#[cfg(test)]
mod tests;
