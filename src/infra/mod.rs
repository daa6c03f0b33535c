pub mod github;
#[cfg(test)]
pub mod memory;
pub mod redmine;
