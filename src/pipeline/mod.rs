pub mod board;
pub mod layout;
pub mod pad;
pub mod persistence;
pub mod project;
pub mod storage;
pub mod track;

#[cfg(test)]
pub mod test_fixture;
