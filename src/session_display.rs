use crate::session::{Permission, ScanSession};

pub const AWAITING_PERMISSION: &str = "Aguardando permissão para acessar a Câmera";
pub const NO_PERMISSION: &str = "Sem permissão para acessar a Câmera";
pub const GUIDE: &str = "Alinhe o código de barras ao centro da tela";
pub const SUBMITTING: &str = "Enviando código de barras...";

/// Text the station shows for the current session: guide, available
/// actions and the loading message while a submission is out.
pub fn render(session: &ScanSession) -> Vec<String> {
    match session.permission() {
        Permission::Pending => return vec![AWAITING_PERMISSION.to_string()],
        Permission::Denied => return vec![NO_PERMISSION.to_string()],
        Permission::Granted => {}
    }

    let state = session.state();
    let capture = session.capture_settings();
    let mut lines = vec![GUIDE.to_string()];

    if state.submitting {
        lines.push(SUBMITTING.to_string());
    } else if state.locked {
        lines.push("[novamente] Clique para escanear novamente".to_string());
    }

    if state.camera_on {
        lines.push("[fechar] Fechar Câmera".to_string());
        let torch = if capture.torch { "ligada" } else { "desligada" };
        lines.push(format!("[lanterna] Lanterna {}", torch));
        let reader = if capture.active { "ativo" } else { "pausado" };
        lines.push(format!(
            "Leitor {} (tipos: {})",
            reader,
            capture.barcode_types.join(", ")
        ));
    } else {
        lines.push("[abrir] Abrir Câmera".to_string());
    }
    lines
}
