fn main() {
    println!("gear with {} teeth", gear::teeth());
}
