use crate::core::persona::Persona;

pub fn list_personas(default: Persona) {
    println!("Available personas:\n");
    for persona in Persona::ALL {
        let marker = if persona == default { " (default)" } else { "" };
        println!(
            "  • {:<6} {}{marker}\n           {}; parameters: {}",
            persona.id(),
            persona.display_name(),
            persona.role(),
            persona.parameter_summary()
        );
    }
    println!("\n💡 Chat as a persona with:");
    println!("   switchboard -P <id>");
}
