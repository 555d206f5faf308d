fn main() {
    println!("widget with {} teeth", gear::teeth());
}
