/// Built in shapes that can be drawn without loading a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// A cube with edges of `size` metres
    Box {
        /// Edge length
        size: f32,
    },
}
