pub mod render_buffers;
