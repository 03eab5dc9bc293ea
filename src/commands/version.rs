use crate::version;

pub fn execute() {
    println!("{} {}", version::PKG_NAME, version::VERSION);
}
