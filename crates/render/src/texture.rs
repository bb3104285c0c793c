use shaderlab_common::ResourceId;

/// A loaded 2D texture. Only its identity and size matter to the helpers here;
/// pixel data stays with the host device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2D {
    id: ResourceId,
    name: String,
    width: u32,
    height: u32,
}

impl Texture2D {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
            width,
            height,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
