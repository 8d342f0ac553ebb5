use shared::domain::DocumentLink;

/// Shared drive folders linked from the documents section.
pub const DOCUMENTS: &[DocumentLink] = &[
    DocumentLink {
        label: "Dossier chantiers",
        icon: "fa-helmet-safety",
        url: "https://drive.google.com/drive/folders/XXXXXXXX",
    },
    DocumentLink {
        label: "Comptabilité",
        icon: "fa-coins",
        url: "https://drive.google.com/drive/folders/YYYYYYYY",
    },
    DocumentLink {
        label: "Ressources humaines",
        icon: "fa-people-roof",
        url: "https://drive.google.com/drive/folders/ZZZZZZZZ",
    },
    DocumentLink {
        label: "Identité de marque",
        icon: "fa-palette",
        url: "https://drive.google.com",
    },
];
