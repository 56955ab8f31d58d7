use glam::Mat4;

use crate::content::{Color, MeshRef};

/// Debug line geometry. `Grid` is a square XZ grid of unit cells
/// centered on the transform's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMesh {
    Grid { half_cells: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Mesh {
        mesh: MeshRef,
        color: Color,
        matrix: Mat4,
    },
    Lines {
        lines: LineMesh,
        color: Color,
        matrix: Mat4,
    },
}

/// Backend seam. The simulation never talks to a window or GPU; it
/// emits draw commands through this trait and a backend decides what
/// they mean.
pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw_mesh(&mut self, mesh: MeshRef, color: Color, matrix: Mat4);
    fn draw_lines(&mut self, lines: LineMesh, color: Color, matrix: Mat4);
}

/// Captures draw commands for tests and headless statistics.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn mesh_commands(&self) -> impl Iterator<Item = (&MeshRef, &Color, &Mat4)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Mesh { mesh, color, matrix } => Some((mesh, color, matrix)),
            DrawCommand::Lines { .. } => None,
        })
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn draw_mesh(&mut self, mesh: MeshRef, color: Color, matrix: Mat4) {
        self.commands.push(DrawCommand::Mesh { mesh, color, matrix });
    }

    fn draw_lines(&mut self, lines: LineMesh, color: Color, matrix: Mat4) {
        self.commands.push(DrawCommand::Lines { lines, color, matrix });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_drops_the_previous_recording() {
        let mut renderer = RecordingRenderer::new();
        renderer.draw_mesh(MeshRef::Cube, Color::default(), Mat4::IDENTITY);
        assert_eq!(renderer.command_count(), 1);

        renderer.begin_frame();
        assert_eq!(renderer.command_count(), 0);
    }

    #[test]
    fn commands_are_recorded_in_submission_order() {
        let mut renderer = RecordingRenderer::new();
        renderer.draw_lines(
            LineMesh::Grid { half_cells: 10 },
            Color::default(),
            Mat4::IDENTITY,
        );
        renderer.draw_mesh(MeshRef::Sphere, Color::rgb(1.0, 0.0, 0.0), Mat4::IDENTITY);

        assert_eq!(renderer.command_count(), 2);
        assert!(matches!(renderer.commands()[0], DrawCommand::Lines { .. }));
        assert!(matches!(
            renderer.commands()[1],
            DrawCommand::Mesh {
                mesh: MeshRef::Sphere,
                ..
            }
        ));
    }
}
