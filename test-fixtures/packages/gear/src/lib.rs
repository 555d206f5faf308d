pub fn teeth() -> u32 {
    12
}
