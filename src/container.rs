use crate::error::{Result, ViewError};
use crate::surface::{Color, Surface};

/// Mount point a view attaches its drawing surface to
pub trait Container {
    /// Client width and height, in surface pixels
    fn client_size(&self) -> (usize, usize);

    /// Attaches a drawing surface; a container holds at most one
    fn append_surface(&mut self, surface: &Surface) -> Result<()>;

    /// Shows the surface's current contents, with optional text on top
    fn present(&mut self, surface: &Surface, overlay: &[String]) -> Result<()>;

    /// Detaches the drawing surface
    fn remove_surface(&mut self) -> Result<()>;

    fn surface_count(&self) -> usize;
}

/// Container that keeps presented frames in memory, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    width: usize,
    height: usize,
    surfaces: usize,
    presents: u64,
    last_frame: Vec<Color>,
    overlay: Vec<String>,
}

impl MemoryContainer {
    pub fn new(width: usize, height: usize) -> Self {
        MemoryContainer {
            width,
            height,
            ..MemoryContainer::default()
        }
    }

    /// Number of frames presented since creation
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Pixels of the most recently presented frame
    pub fn last_frame(&self) -> &[Color] {
        &self.last_frame
    }

    pub fn overlay(&self) -> &[String] {
        &self.overlay
    }
}

impl Container for MemoryContainer {
    fn client_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn append_surface(&mut self, _surface: &Surface) -> Result<()> {
        if self.surfaces > 0 {
            return Err(ViewError::SurfaceAttached);
        }
        self.surfaces = 1;
        Ok(())
    }

    fn present(&mut self, surface: &Surface, overlay: &[String]) -> Result<()> {
        if self.surfaces == 0 {
            return Err(ViewError::NoSurface);
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(surface.pixels());
        self.overlay = overlay.to_vec();
        self.presents += 1;
        Ok(())
    }

    fn remove_surface(&mut self) -> Result<()> {
        if self.surfaces == 0 {
            return Err(ViewError::NoSurface);
        }
        self.surfaces = 0;
        Ok(())
    }

    fn surface_count(&self) -> usize {
        self.surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_at_most_one_surface() {
        let mut container = MemoryContainer::new(4, 4);
        let surface = Surface::new(4, 4);
        container.append_surface(&surface).unwrap();
        assert!(matches!(
            container.append_surface(&surface),
            Err(ViewError::SurfaceAttached)
        ));
        assert_eq!(container.surface_count(), 1);
        container.remove_surface().unwrap();
        assert_eq!(container.surface_count(), 0);
        assert!(matches!(container.remove_surface(), Err(ViewError::NoSurface)));
    }

    #[test]
    fn presenting_requires_an_attached_surface() {
        let mut container = MemoryContainer::new(2, 2);
        let surface = Surface::new(2, 2);
        assert!(container.present(&surface, &[]).is_err());
        container.append_surface(&surface).unwrap();
        container.present(&surface, &["hello".to_string()]).unwrap();
        assert_eq!(container.presents(), 1);
        assert_eq!(container.last_frame().len(), 4);
        assert_eq!(container.overlay(), ["hello".to_string()]);
    }
}
