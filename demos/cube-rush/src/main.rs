fn main() {
    cube_rush::main();
}
