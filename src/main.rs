#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    gstr_consolidator_lib::run()
}
